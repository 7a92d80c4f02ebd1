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

//! Timing-policy wrappers: delay, debounce, throttle
//!
//! Each wrapper takes a [`Callback`] and returns a new one with the same
//! shape. Per-wrapper state (the debounce timer slot, the throttle
//! `waiting` flag) lives in the returned closure, so two bindings never
//! share it. Timers are armed through the binding's [`TimerScope`].
//!
//! # Options
//! Timing options come from the modifier set:
//! ```text
//! __delay.200ms
//! __debounce.100ms.leading.notrailing
//! __throttle.1s.noleading.trailing
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::core::types::{options, KeyboardEvent, ModifierSet};
use crate::timing::scheduler::{TimerKey, TimerScope};

/// A callback in the wrapping chain
pub type Callback = Rc<dyn Fn(Option<KeyboardEvent>)>;

/// Wait and edge flags for debounce or throttle
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EdgeOptions {
    pub wait: Duration,
    /// Fire on the first invocation of a burst
    pub leading: bool,
    /// Fire when the wait elapses
    pub trailing: bool,
}

impl EdgeOptions {
    /// True if neither edge is enabled, so the wrapped callback never runs
    pub fn never_fires(&self) -> bool {
        !self.leading && !self.trailing
    }
}

/// Timing options resolved from a modifier set
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimingOptions {
    pub delay: Option<Duration>,
    pub debounce: Option<EdgeOptions>,
    pub throttle: Option<EdgeOptions>,
}

impl TimingOptions {
    /// Reads `delay`, `debounce` and `throttle` from `mods`
    ///
    /// Debounce defaults to trailing only (`leading` enables the leading
    /// edge, `notrailing` disables the trailing one). Throttle defaults to
    /// leading only (`noleading` and `trailing` flip those).
    pub fn from_modifiers(mods: &ModifierSet) -> Self {
        let delay = mods
            .tags(options::DELAY)
            .map(|tags| parse_wait(tags.iter().map(String::as_str)));

        let debounce = mods.tags(options::DEBOUNCE).map(|tags| EdgeOptions {
            wait: parse_wait(tags.iter().map(String::as_str)),
            leading: tags.contains("leading"),
            trailing: !tags.contains("notrailing"),
        });

        let throttle = mods.tags(options::THROTTLE).map(|tags| EdgeOptions {
            wait: parse_wait(tags.iter().map(String::as_str)),
            leading: !tags.contains("noleading"),
            trailing: tags.contains("trailing"),
        });

        Self {
            delay,
            debounce,
            throttle,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.delay.is_none() && self.debounce.is_none() && self.throttle.is_none()
    }
}

/// Resolves the wait magnitude from an option's tags
///
/// The first tag that reads as a duration wins: `"100ms"` → 100ms,
/// `"0.1s"` → 100ms, `"50"` → 50ms. Without such a tag the wait is zero.
/// Negative and NaN values are treated as zero; values too large to
/// represent saturate.
///
/// # Example
/// ```
/// use on_keys::timing::parse_wait;
/// use std::time::Duration;
///
/// assert_eq!(parse_wait(["leading", "250ms"]), Duration::from_millis(250));
/// assert_eq!(parse_wait(["leading"]), Duration::ZERO);
/// ```
pub fn parse_wait<'a>(tags: impl IntoIterator<Item = &'a str>) -> Duration {
    tags.into_iter()
        .find_map(parse_millis)
        .map(millis_to_duration)
        .unwrap_or(Duration::ZERO)
}

fn parse_millis(tag: &str) -> Option<f64> {
    let tag = tag.trim();
    if let Some(ms) = tag.strip_suffix("ms") {
        return ms.parse::<f64>().ok();
    }
    if let Some(secs) = tag.strip_suffix('s') {
        return secs.parse::<f64>().ok().map(|s| s * 1000.0);
    }
    tag.parse::<f64>().ok()
}

fn millis_to_duration(ms: f64) -> Duration {
    if ms.is_nan() || ms <= 0.0 {
        return Duration::ZERO;
    }
    // Microsecond resolution keeps "0.1s" at exactly 100ms; the float to
    // integer cast saturates, so huge and infinite waits clamp to u64::MAX
    Duration::from_micros((ms * 1000.0).round() as u64)
}

/// Defers every invocation by `wait`; invocations are never coalesced
pub fn delay(callback: Callback, wait: Duration, scope: &Rc<TimerScope>) -> Callback {
    let scope = Rc::clone(scope);
    Rc::new(move |evt| {
        let callback = Rc::clone(&callback);
        scope.arm(wait, move || callback(evt));
    })
}

/// Collapses bursts of invocations
///
/// Every invocation cancels the pending timer and arms a new one. With
/// `leading`, an invocation that finds no timer pending fires at once.
/// With `trailing`, the timer fires the callback with the last invocation's
/// event once `wait` passes without another invocation.
pub fn debounce(
    callback: Callback,
    options: EdgeOptions,
    scope: &Rc<TimerScope>,
) -> Callback {
    let scope = Rc::clone(scope);
    let pending: Rc<Cell<Option<TimerKey>>> = Rc::new(Cell::new(None));

    Rc::new(move |evt| {
        // The slot stays set after clearing, so a burst only leads once
        if let Some(key) = pending.get() {
            scope.clear(key);
        }

        if options.leading && pending.get().is_none() {
            callback(evt.clone());
        }

        let trailing_callback = Rc::clone(&callback);
        let slot = Rc::clone(&pending);
        let key = scope.arm(options.wait, move || {
            if options.trailing {
                trailing_callback(evt);
            }
            slot.set(None);
        });
        pending.set(Some(key));
    })
}

/// Lets at most one invocation through per `wait` window
///
/// While a window is open every invocation is dropped. An invocation that
/// opens a window fires at once with `leading`, and again when the window
/// closes with `trailing` (with the event that opened the window).
pub fn throttle(
    callback: Callback,
    options: EdgeOptions,
    scope: &Rc<TimerScope>,
) -> Callback {
    let scope = Rc::clone(scope);
    let waiting = Rc::new(Cell::new(false));

    Rc::new(move |evt| {
        if waiting.get() {
            return;
        }

        if options.leading {
            callback(evt.clone());
        }
        waiting.set(true);

        let trailing_callback = Rc::clone(&callback);
        let flag = Rc::clone(&waiting);
        scope.arm(options.wait, move || {
            if options.trailing {
                trailing_callback(evt);
            }
            flag.set(false);
        });
    })
}

/// Applies delay, then debounce, then throttle, as requested by `mods`
///
/// Options that are absent leave the callback untouched.
pub fn modify_timing(callback: Callback, mods: &ModifierSet, scope: &Rc<TimerScope>) -> Callback {
    let timing = TimingOptions::from_modifiers(mods);
    let mut callback = callback;

    if let Some(wait) = timing.delay {
        callback = delay(callback, wait, scope);
    }
    if let Some(options) = timing.debounce {
        callback = debounce(callback, options, scope);
    }
    if let Some(options) = timing.throttle {
        callback = throttle(callback, options, scope);
    }

    callback
}
