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

//! Timing wrapper tests
//!
//! All tests drive a `VirtualScheduler`, so "20ms later" is exact.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::core::types::{KeyboardEvent, ModifierSet};
use crate::timing::scheduler::{TimerScope, VirtualScheduler};
use crate::timing::wrappers::*;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Virtual clock, a timer scope on it, and a callback that records the
/// clock time and key of every invocation
struct Harness {
    clock: Rc<VirtualScheduler>,
    scope: Rc<TimerScope>,
    calls: Rc<RefCell<Vec<(Duration, String)>>>,
}

impl Harness {
    fn new() -> Self {
        let clock = Rc::new(VirtualScheduler::new());
        let scope = Rc::new(TimerScope::new(clock.clone()));
        Self {
            clock,
            scope,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn callback(&self) -> Callback {
        let clock = Rc::clone(&self.clock);
        let calls = Rc::clone(&self.calls);
        Rc::new(move |evt: Option<KeyboardEvent>| {
            let key = evt.map(|e| e.key).unwrap_or_default();
            calls.borrow_mut().push((clock.now(), key));
        })
    }

    fn call(&self, wrapped: &Callback, key: &str) {
        wrapped(Some(KeyboardEvent::new(key)));
    }

    fn advance(&self, n: u64) {
        self.clock.advance(ms(n));
    }

    fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn times(&self) -> Vec<Duration> {
        self.calls.borrow().iter().map(|(at, _)| *at).collect()
    }

    fn keys(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(_, key)| key.clone()).collect()
    }
}

fn edges(wait: u64, leading: bool, trailing: bool) -> EdgeOptions {
    EdgeOptions {
        wait: ms(wait),
        leading,
        trailing,
    }
}

#[test]
fn test_parse_wait_units() {
    assert_eq!(parse_wait(["100ms"]), ms(100));
    assert_eq!(parse_wait(["0.1s"]), ms(100));
    assert_eq!(parse_wait(["2s"]), ms(2000));
    assert_eq!(parse_wait(["50"]), ms(50));
    assert_eq!(parse_wait(["12.5"]), Duration::from_micros(12_500));
}

#[test]
fn test_parse_wait_without_number_is_zero() {
    assert_eq!(parse_wait(std::iter::empty::<&str>()), Duration::ZERO);
    assert_eq!(parse_wait(["leading", "notrailing"]), Duration::ZERO);
    assert_eq!(parse_wait(["fastms", "ms", "s"]), Duration::ZERO);
}

#[test]
fn test_parse_wait_skips_flags() {
    assert_eq!(parse_wait(["leading", "300ms"]), ms(300));
}

#[test]
fn test_parse_wait_clamps_negative() {
    assert_eq!(parse_wait(["-100ms"]), Duration::ZERO);
    assert_eq!(parse_wait(["-inf"]), Duration::ZERO);
    assert_eq!(parse_wait(["nan"]), Duration::ZERO);
}

#[test]
fn test_parse_wait_saturates_huge_values() {
    let max = Duration::from_micros(u64::MAX);
    assert_eq!(parse_wait(["1e20ms"]), max);
    // Overflows f64 to infinity before the cast
    assert_eq!(parse_wait(["1e308s"]), max);
    assert_eq!(parse_wait(["inf"]), max);
}

#[test]
fn test_parse_wait_first_declared_magnitude_wins() {
    assert_eq!(parse_wait(["50", "100ms"]), ms(50));

    let mods = ModifierSet::new().with_tags("debounce", ["50", "100ms"]);
    let timing = TimingOptions::from_modifiers(&mods);
    assert_eq!(timing.debounce, Some(edges(50, false, true)));

    let mods = ModifierSet::new().with_tags("throttle", ["2s", "100ms"]);
    let timing = TimingOptions::from_modifiers(&mods);
    assert_eq!(timing.throttle, Some(edges(2000, true, false)));
}

#[test]
fn test_timing_options_defaults() {
    let mods = ModifierSet::new()
        .with_tags("debounce", ["100ms"])
        .with_tags("throttle", ["1s"]);
    let timing = TimingOptions::from_modifiers(&mods);

    assert_eq!(timing.delay, None);
    assert_eq!(timing.debounce, Some(edges(100, false, true)));
    assert_eq!(timing.throttle, Some(edges(1000, true, false)));
}

#[test]
fn test_timing_options_flags() {
    let mods = ModifierSet::new()
        .with_tags("debounce", ["100ms", "leading", "notrailing"])
        .with_tags("throttle", ["1s", "noleading", "trailing"])
        .with_tags("delay", ["20ms"]);
    let timing = TimingOptions::from_modifiers(&mods);

    assert_eq!(timing.delay, Some(ms(20)));
    assert_eq!(timing.debounce, Some(edges(100, true, false)));
    assert_eq!(timing.throttle, Some(edges(1000, false, true)));
}

#[test]
fn test_timing_options_empty() {
    assert!(TimingOptions::from_modifiers(&ModifierSet::new().with("el")).is_empty());
}

#[test]
fn test_delay_defers_every_call() {
    let h = Harness::new();
    let wrapped = delay(h.callback(), ms(50), &h.scope);

    h.call(&wrapped, "a");
    h.advance(10);
    h.call(&wrapped, "b");
    assert_eq!(h.count(), 0);

    h.advance(100);
    assert_eq!(h.times(), vec![ms(50), ms(60)]);
    assert_eq!(h.keys(), vec!["a", "b"]);
}

#[test]
fn test_debounce_trailing_collapses_burst() {
    let h = Harness::new();
    let wrapped = debounce(h.callback(), edges(100, false, true), &h.scope);

    h.call(&wrapped, "a");
    h.advance(20);
    h.call(&wrapped, "b");
    h.advance(20);
    h.call(&wrapped, "c");

    h.advance(99);
    assert_eq!(h.count(), 0);

    h.advance(1);
    assert_eq!(h.count(), 1);
    // Fires 100ms after the last call, with the last call's event
    assert_eq!(h.times(), vec![ms(140)]);
    assert_eq!(h.keys(), vec!["c"]);

    h.advance(1000);
    assert_eq!(h.count(), 1);
}

#[test]
fn test_debounce_leading_and_trailing() {
    let h = Harness::new();
    let wrapped = debounce(h.callback(), edges(100, true, true), &h.scope);

    h.call(&wrapped, "a");
    assert_eq!(h.count(), 1);

    h.advance(20);
    h.call(&wrapped, "b");
    h.advance(20);
    h.call(&wrapped, "c");
    assert_eq!(h.count(), 1);

    h.advance(200);
    assert_eq!(h.count(), 2);
    assert_eq!(h.keys(), vec!["a", "c"]);
}

#[test]
fn test_debounce_leading_fires_again_after_quiet_period() {
    let h = Harness::new();
    let wrapped = debounce(h.callback(), edges(100, true, false), &h.scope);

    h.call(&wrapped, "a");
    h.call(&wrapped, "b");
    h.advance(150);
    h.call(&wrapped, "c");

    assert_eq!(h.keys(), vec!["a", "c"]);
}

#[test]
fn test_debounce_keeps_single_timer() {
    let h = Harness::new();
    let wrapped = debounce(h.callback(), edges(100, false, true), &h.scope);

    for _ in 0..5 {
        h.call(&wrapped, "k");
        h.advance(10);
    }
    assert_eq!(h.scope.pending(), 1);
}

#[test]
fn test_throttle_leading_drops_calls_in_window() {
    let h = Harness::new();
    let wrapped = throttle(h.callback(), edges(100, true, false), &h.scope);

    h.call(&wrapped, "a");
    assert_eq!(h.count(), 1);

    h.advance(30);
    h.call(&wrapped, "b");
    h.advance(30);
    h.call(&wrapped, "c");
    assert_eq!(h.count(), 1);

    h.advance(50);
    h.call(&wrapped, "d");
    assert_eq!(h.keys(), vec!["a", "d"]);
    assert_eq!(h.times(), vec![ms(0), ms(110)]);
}

#[test]
fn test_throttle_noleading_waits_for_trailing() {
    let h = Harness::new();
    let wrapped = throttle(h.callback(), edges(100, false, true), &h.scope);

    h.call(&wrapped, "a");
    assert_eq!(h.count(), 0);

    h.advance(50);
    h.call(&wrapped, "b");
    h.advance(50);

    // Trailing call carries the event that opened the window
    assert_eq!(h.keys(), vec!["a"]);
    assert_eq!(h.times(), vec![ms(100)]);
}

#[test]
fn test_throttle_noleading_notrailing_never_fires() {
    let h = Harness::new();
    let wrapped = throttle(h.callback(), edges(100, false, false), &h.scope);

    h.call(&wrapped, "a");
    h.advance(200);
    h.call(&wrapped, "b");
    h.advance(200);
    assert_eq!(h.count(), 0);
}

#[test]
fn test_wrappers_have_private_state() {
    let h = Harness::new();
    let first = throttle(h.callback(), edges(100, true, false), &h.scope);
    let second = throttle(h.callback(), edges(100, true, false), &h.scope);

    h.call(&first, "a");
    h.call(&second, "b");
    assert_eq!(h.keys(), vec!["a", "b"]);
}

#[test]
fn test_modify_timing_without_options_is_identity() {
    let h = Harness::new();
    let wrapped = modify_timing(h.callback(), &ModifierSet::new(), &h.scope);

    h.call(&wrapped, "a");
    assert_eq!(h.count(), 1);
    assert_eq!(h.scope.pending(), 0);
}

#[test]
fn test_modify_timing_composes_delay_and_debounce() {
    let h = Harness::new();
    let mods = ModifierSet::new()
        .with_tags("delay", ["50ms"])
        .with_tags("debounce", ["100ms"]);
    let wrapped = modify_timing(h.callback(), &mods, &h.scope);

    h.call(&wrapped, "a");
    h.advance(10);
    h.call(&wrapped, "b");

    // Debounce settles at 110ms, then the delay adds 50ms
    h.advance(149);
    assert_eq!(h.count(), 0);
    h.advance(1);
    assert_eq!(h.keys(), vec!["b"]);
    assert_eq!(h.times(), vec![ms(160)]);
}

#[test]
fn test_cancelling_scope_drops_pending_trailing_call() {
    let h = Harness::new();
    let wrapped = debounce(h.callback(), edges(100, false, true), &h.scope);

    h.call(&wrapped, "a");
    h.scope.cancel_all();
    h.advance(500);
    assert_eq!(h.count(), 0);
}
