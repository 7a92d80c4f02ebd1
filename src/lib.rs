// Copyright 2025 bakri (tidynest@proton.me)
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

//! on-keys
//!
//! Declarative keyboard shortcuts: bind a key specification such as
//! `"esc.ctrl-k"` to a callback, with optional timing policies, and get
//! back a handle that removes the binding again.
//!
//! # Features
//!
//! - **Combo Parsing:** `ctrl-shift-s`, modifier aliases, `.`-separated lists
//! - **Key Normalization:** `esc` → `Escape`, `up` → `ArrowUp`, `space` → `" "`
//! - **Exact Matching:** modifier flags must match exactly
//! - **Timing Policies:** delay, debounce and throttle with leading/trailing edges
//! - **Listener Options:** element or window target, keyup, capture, passive, once
//! - **Deterministic Disposal:** removes the listener and cancels armed timers
//! - **Tooling:** bindings files, conflict detection, lint and simulation
//!
//! # Architecture
//!
//! - **`core`:** Combo types, parsing, normalization, matching, conflicts, lint
//! - **`timing`:** Scheduler trait, virtual and tokio clocks, timing wrappers,
//!   view transitions
//! - **`binding`:** Event model, event targets, the binding controller
//! - **`config`:** TOML bindings files
//! - **`simulate`:** Replays scripted key presses on a virtual clock
//!
//! Everything is single-threaded: bindings, targets and schedulers are
//! `Rc`-based and `!Send`.
//!
//! # Examples
//!
//! ## Binding a shortcut
//!
//! ```
//! use on_keys::binding::{BindRequest, Event, KeyBinder, LocalTarget};
//! use on_keys::core::{ComboModifiers, KeyboardEvent, ModifierSet};
//! use on_keys::timing::VirtualScheduler;
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! let window = LocalTarget::root("window");
//! let input = LocalTarget::child(&window, "input");
//! let clock = Rc::new(VirtualScheduler::new());
//! let binder = KeyBinder::new(window.clone(), clock.clone());
//!
//! let saves = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&saves);
//! let mods = ModifierSet::new().with_tags("debounce", ["200ms"]);
//! let binding = binder.apply(BindRequest {
//!     element: input.clone(),
//!     key: Some("ctrl-s"),
//!     mods: &mods,
//!     receiver: Rc::new(move |_| counter.set(counter.get() + 1)),
//! });
//!
//! let ctrl = ComboModifiers { ctrl: true, ..ComboModifiers::NONE };
//! for _ in 0..3 {
//!     input.dispatch(&mut Event::key_down(KeyboardEvent::new("s").with_modifiers(ctrl)));
//! }
//! clock.advance(Duration::from_millis(200));
//! assert_eq!(saves.get(), 1);
//!
//! binding.dispose();
//! ```
//!
//! ## Checking a bindings file
//!
//! ```no_run
//! use on_keys::config::BindingsFile;
//! use std::path::Path;
//!
//! let file = BindingsFile::load(Path::new("/tmp/bindings.toml"))?;
//! let report = file.check()?;
//! for conflict in &report.conflicts {
//!     println!("{} ({})", conflict.combo, conflict.trigger);
//! }
//! # Ok::<(), on_keys::config::ConfigError>(())
//! ```

pub mod binding;
pub mod config;
pub mod core;
pub mod simulate;
pub mod timing;

// Re-export commonly used types for convenience
pub use binding::{BindRequest, Binding, KeyBinder};
pub use core::{ComboSpec, KeyboardEvent, ModifierSet};
