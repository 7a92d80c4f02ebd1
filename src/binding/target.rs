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

//! Event targets
//!
//! [`EventTarget`] is the registration contract bindings rely on.
//! [`LocalTarget`] is an in-memory implementation: a tree of named targets
//! with capture and bubble phases, used by the simulator and the tests.
//!
//! # Dispatch order
//! For an event dispatched on a target with ancestors `window → body`:
//! 1. capture listeners on `window`, then `body`
//! 2. all listeners on the target itself, capture ones first
//! 3. bubble listeners on `body`, then `window`
//!
//! `stop_propagation` finishes the current target and skips the rest.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::binding::event::{Event, EventType, ListenerOptions};

/// A registered event handler; identity is the `Rc` pointer
pub type Listener = Rc<dyn Fn(&mut Event)>;

/// `addEventListener`-style registration contract
pub trait EventTarget {
    /// Registers `listener`; re-adding the same listener with the same
    /// type and capture flag is a no-op
    fn add_event_listener(&self, kind: EventType, listener: Listener, options: ListenerOptions);

    /// Removes the listener registered with the same type, pointer and
    /// capture flag; anything else is ignored
    fn remove_event_listener(&self, kind: EventType, listener: &Listener, options: ListenerOptions);
}

struct Registration {
    kind: EventType,
    listener: Listener,
    options: ListenerOptions,
    /// Set on removal so an in-flight dispatch skips the listener
    removed: Rc<Cell<bool>>,
}

impl Registration {
    fn is(&self, kind: EventType, listener: &Listener, capture: bool) -> bool {
        self.kind == kind && self.options.capture == capture && Rc::ptr_eq(&self.listener, listener)
    }
}

/// In-memory event target with an optional parent
///
/// # Example
/// ```
/// use on_keys::binding::{Event, EventTarget, EventType, Listener, ListenerOptions, LocalTarget};
/// use on_keys::core::KeyboardEvent;
/// use std::rc::Rc;
///
/// let window = LocalTarget::root("window");
/// let input = LocalTarget::child(&window, "input");
///
/// let listener: Listener = Rc::new(|event: &mut Event| event.prevent_default());
/// window.add_event_listener(EventType::KeyDown, listener, ListenerOptions::default());
///
/// // Bubbles from the input up to the window
/// let allowed = input.dispatch(&mut Event::key_down(KeyboardEvent::new("k")));
/// assert!(!allowed);
/// ```
pub struct LocalTarget {
    name: String,
    parent: Option<Rc<LocalTarget>>,
    listeners: RefCell<Vec<Registration>>,
}

impl LocalTarget {
    /// Creates a target without a parent (a window or document)
    pub fn root(name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            parent: None,
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Creates a target nested under `parent`
    pub fn child(parent: &Rc<LocalTarget>, name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            parent: Some(Rc::clone(parent)),
            listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of listeners registered for `kind`
    pub fn listener_count(&self, kind: EventType) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    /// Dispatches `event` through this target and its ancestors
    ///
    /// Returns `false` if a listener prevented the default action, like
    /// `dispatchEvent`.
    pub fn dispatch(&self, event: &mut Event) -> bool {
        let mut ancestors = Vec::new();
        let mut current = self.parent.as_deref();
        while let Some(target) = current {
            ancestors.push(target);
            current = target.parent.as_deref();
        }

        tracing::trace!(on = %self.name, kind = %event.kind(), "dispatching event");

        // Capture: outermost ancestor first
        for target in ancestors.iter().rev() {
            target.invoke(event, true);
            if event.propagation_stopped() {
                return !event.default_prevented();
            }
        }

        self.invoke(event, true);
        self.invoke(event, false);
        if event.propagation_stopped() {
            return !event.default_prevented();
        }

        for target in &ancestors {
            target.invoke(event, false);
            if event.propagation_stopped() {
                break;
            }
        }

        !event.default_prevented()
    }

    /// Runs the listeners for `event`'s type registered for one phase
    fn invoke(&self, event: &mut Event, capture: bool) {
        // Snapshot so listeners may add or remove listeners while running
        let snapshot: Vec<(Listener, ListenerOptions, Rc<Cell<bool>>)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|r| r.kind == event.kind())
            .filter(|r| r.options.capture == capture)
            .map(|r| (Rc::clone(&r.listener), r.options, Rc::clone(&r.removed)))
            .collect();

        for (listener, options, removed) in snapshot {
            if removed.get() {
                continue;
            }
            if options.once {
                self.remove_event_listener(event.kind(), &listener, options);
            }

            event.set_in_passive_listener(options.passive);
            listener(event);
            event.set_in_passive_listener(false);
        }
    }
}

impl EventTarget for LocalTarget {
    fn add_event_listener(&self, kind: EventType, listener: Listener, options: ListenerOptions) {
        let mut listeners = self.listeners.borrow_mut();
        if listeners
            .iter()
            .any(|r| r.is(kind, &listener, options.capture))
        {
            return;
        }

        listeners.push(Registration {
            kind,
            listener,
            options,
            removed: Rc::new(Cell::new(false)),
        });
    }

    fn remove_event_listener(&self, kind: EventType, listener: &Listener, options: ListenerOptions) {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(index) = listeners
            .iter()
            .position(|r| r.is(kind, listener, options.capture))
        {
            let registration = listeners.remove(index);
            registration.removed.set(true);
        }
    }
}
