// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Binding controller - wires a key specification to a receiver callback
//!
//! # Responsibilities
//!
//! - Parse the raw key specification once, at bind time
//! - Pick the target: the element with `el`, the window otherwise
//! - Build the callback chain: batch hooks → view transition → timing
//! - Register a handler that filters, matches and forwards events
//! - Hand back a [`Binding`] whose `dispose` undoes all of the above
//!
//! # Lifecycle
//!
//! ```text
//! KeyBinder::apply ──► Bound ──dispose()──► Disposed
//! ```
//!
//! Nothing here fails: malformed combos simply never match.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::binding::event::{Event, EventType, ListenerOptions};
use crate::binding::target::{EventTarget, Listener};
use crate::core::matcher::matches_any;
use crate::core::parser::parse_combo_list;
use crate::core::types::{options, ComboSpec, ComboSpecList, ModifierSet};
use crate::timing::scheduler::{Scheduler, TimerScope};
use crate::timing::transition::{modify_view_transition, ViewTransition};
use crate::timing::wrappers::{modify_timing, Callback};

/// Transaction boundaries run around every receiver invocation
#[derive(Clone)]
pub struct BatchHooks {
    begin: Rc<dyn Fn()>,
    end: Rc<dyn Fn()>,
}

impl BatchHooks {
    pub fn new(begin: impl Fn() + 'static, end: impl Fn() + 'static) -> Self {
        Self {
            begin: Rc::new(begin),
            end: Rc::new(end),
        }
    }

    /// Hooks that do nothing
    pub fn none() -> Self {
        Self::new(|| {}, || {})
    }
}

impl Default for BatchHooks {
    fn default() -> Self {
        Self::none()
    }
}

/// Everything needed to bind one attribute
pub struct BindRequest<'a> {
    /// Element carrying the attribute; the target when `el` is present
    pub element: Rc<dyn EventTarget>,

    /// Raw key specification (`"esc.alt-q"`), `None` if none was given
    pub key: Option<&'a str>,

    pub mods: &'a ModifierSet,

    /// Receives the matched keyboard event
    pub receiver: Callback,
}

/// Lifecycle state of a [`Binding`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BindingState {
    Bound,
    Disposed,
}

/// Boxed disposer, for hosts that only keep a cleanup closure
pub type Disposer = Box<dyn FnOnce()>;

/// Creates bindings against a window target and a timer source
///
/// # Example
///
/// ```
/// use on_keys::binding::{BindRequest, Event, KeyBinder, LocalTarget};
/// use on_keys::core::{KeyboardEvent, ModifierSet};
/// use on_keys::timing::VirtualScheduler;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let window = LocalTarget::root("window");
/// let element = LocalTarget::child(&window, "dialog");
/// let binder = KeyBinder::new(window.clone(), Rc::new(VirtualScheduler::new()));
///
/// let closed = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&closed);
/// let binding = binder.apply(BindRequest {
///     element: element.clone(),
///     key: Some("esc"),
///     mods: &ModifierSet::new(),
///     receiver: Rc::new(move |_| counter.set(counter.get() + 1)),
/// });
///
/// element.dispatch(&mut Event::key_down(KeyboardEvent::new("Escape")));
/// assert_eq!(closed.get(), 1);
///
/// binding.dispose();
/// element.dispatch(&mut Event::key_down(KeyboardEvent::new("Escape")));
/// assert_eq!(closed.get(), 1);
/// ```
pub struct KeyBinder {
    window: Rc<dyn EventTarget>,
    scheduler: Rc<dyn Scheduler>,
    hooks: BatchHooks,
    view_transition: Option<Rc<dyn ViewTransition>>,
}

impl KeyBinder {
    pub fn new(window: Rc<dyn EventTarget>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            window,
            scheduler,
            hooks: BatchHooks::none(),
            view_transition: None,
        }
    }

    /// Runs `hooks` around every receiver invocation
    pub fn with_batch(mut self, hooks: BatchHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Declares that the host supports view transitions
    pub fn with_view_transition(mut self, capability: Rc<dyn ViewTransition>) -> Self {
        self.view_transition = Some(capability);
        self
    }

    /// Binds a key specification to a receiver
    pub fn apply(&self, request: BindRequest<'_>) -> Binding {
        let BindRequest {
            element,
            key,
            mods,
            receiver,
        } = request;

        let combos: ComboSpecList = key.map(parse_combo_list).unwrap_or_default();

        let on_element = mods.has(options::EL);
        let target = if on_element {
            element
        } else {
            Rc::clone(&self.window)
        };

        let timers = Rc::new(TimerScope::new(Rc::clone(&self.scheduler)));
        let callback = self.build_callback(receiver, mods, &timers);

        let kind = if mods.has(options::UP) {
            EventType::KeyUp
        } else {
            EventType::KeyDown
        };
        let listener_options = ListenerOptions {
            capture: mods.has(options::CAPTURE),
            passive: mods.has(options::PASSIVE),
            once: mods.has(options::ONCE),
        };

        let prevent = key.is_some() && !mods.has(options::NOPREVENT);
        let stop = mods.has(options::STOP);
        let listener = handler(combos.clone(), prevent, stop, callback);

        target.add_event_listener(kind, Rc::clone(&listener), listener_options);

        tracing::debug!(
            combos = ?combos.iter().map(ToString::to_string).collect::<Vec<_>>(),
            %kind,
            on_element,
            options = ?listener_options,
            "key binding registered"
        );

        Binding {
            target,
            kind,
            listener,
            options: listener_options,
            combos,
            timers,
            state: Cell::new(BindingState::Bound),
        }
    }

    /// receiver wrapped in batch hooks, then view transition, then timing
    fn build_callback(
        &self,
        receiver: Callback,
        mods: &ModifierSet,
        timers: &Rc<TimerScope>,
    ) -> Callback {
        let hooks = self.hooks.clone();
        let base: Callback = Rc::new(move |evt| {
            (hooks.begin)();
            receiver(evt);
            (hooks.end)();
        });

        let transitioned = modify_view_transition(base, mods, self.view_transition.as_ref());
        modify_timing(transitioned, mods, timers)
    }
}

/// The listener registered on the target
fn handler(combos: ComboSpecList, prevent: bool, stop: bool, callback: Callback) -> Listener {
    Rc::new(move |event: &mut Event| {
        let Some(keyboard) = event.keyboard().cloned() else {
            tracing::trace!(kind = %event.kind(), "ignoring event without keyboard payload");
            return;
        };

        if !matches_any(&keyboard, &combos) {
            return;
        }
        tracing::trace!(key = %keyboard.key, "key combo matched");

        if prevent {
            event.prevent_default();
        }
        if stop {
            event.stop_propagation();
        }

        callback(Some(keyboard));
    })
}

/// A live registration, owned by whoever applied it
///
/// Target, event type and listener options never change. `dispose`
/// removes the listener with exactly those values and cancels every timer
/// the binding's wrappers still have armed.
pub struct Binding {
    target: Rc<dyn EventTarget>,
    kind: EventType,
    listener: Listener,
    options: ListenerOptions,
    combos: ComboSpecList,
    timers: Rc<TimerScope>,
    state: Cell<BindingState>,
}

impl Binding {
    pub fn event_type(&self) -> EventType {
        self.kind
    }

    pub fn options(&self) -> ListenerOptions {
        self.options
    }

    /// Parsed combos; empty means any key
    pub fn combos(&self) -> &[ComboSpec] {
        &self.combos
    }

    pub fn state(&self) -> BindingState {
        self.state.get()
    }

    pub fn is_bound(&self) -> bool {
        self.state.get() == BindingState::Bound
    }

    /// Timers armed by this binding that have not fired yet
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Removes the listener and cancels pending timers
    ///
    /// Calling it again does nothing.
    pub fn dispose(&self) {
        if self.state.replace(BindingState::Disposed) == BindingState::Disposed {
            return;
        }

        self.target
            .remove_event_listener(self.kind, &self.listener, self.options);
        let cancelled = self.timers.pending();
        self.timers.cancel_all();

        tracing::debug!(kind = %self.kind, cancelled, "key binding disposed");
    }

    /// Converts the binding into a cleanup closure
    pub fn into_disposer(self) -> Disposer {
        Box::new(move || self.dispose())
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("combos", &self.combos)
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}
