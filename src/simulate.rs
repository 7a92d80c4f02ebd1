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

//! Replays a scripted key sequence against a bindings file
//!
//! A script is a comma-separated list of `<ms>:<combo>` presses, e.g.
//! `0:ctrl-k,20:esc,400:esc`. Each press is dispatched as a keydown then a
//! keyup on an element nested in the window, at its virtual time. After the
//! last press the clock runs until no timers are left, so trailing
//! debounce and throttle calls show up in the result.
//!
//! # Example
//! ```
//! use on_keys::config::BindingsFile;
//! use on_keys::simulate::{parse_script, simulate};
//!
//! let file = BindingsFile::from_toml_str(r#"
//!     [[binding]]
//!     attribute = "on-keys:k__debounce.100ms"
//!     action = "search"
//! "#)?;
//!
//! let presses = parse_script("0:k,30:k,60:k")?;
//! let fired = simulate(&file, &presses)?;
//!
//! assert_eq!(fired.len(), 1);
//! assert_eq!(fired[0].at.as_millis(), 160);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use thiserror::Error;

use crate::binding::{BindRequest, Binding, Event, KeyBinder, LocalTarget};
use crate::config::{BindingsFile, ConfigError};
use crate::core::parser::parse_combo;
use crate::core::types::{ComboSpec, KeyboardEvent};
use crate::timing::{InlineTransition, VirtualScheduler};

/// Script parse errors
#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
    #[error("Press '{0}' is missing the '<ms>:' time prefix")]
    MissingTime(String),

    #[error("Invalid time in press '{0}'")]
    InvalidTime(String),

    #[error("Press '{0}' has no base key")]
    KeylessCombo(String),

    #[error("Press '{entry}' happens before the previous press")]
    OutOfOrder { entry: String },
}

/// One scripted key press
#[derive(Clone, Debug, PartialEq)]
pub struct KeyPress {
    /// Virtual time of the press
    pub at: Duration,
    pub combo: ComboSpec,
}

/// One receiver invocation observed during a simulation
#[derive(Clone, Debug, PartialEq)]
pub struct Fired {
    /// Virtual time the action ran
    pub at: Duration,
    pub action: String,
    /// Key of the event the receiver got, if any
    pub key: Option<String>,
}

impl fmt::Display for Fired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}ms  {}", self.at.as_millis(), self.action)?;
        if let Some(key) = &self.key {
            write!(f, " ({:?})", key)?;
        }
        Ok(())
    }
}

/// Parses a press script
///
/// Times are milliseconds, optionally suffixed with `ms`, and must not go
/// backwards. Blank entries are skipped.
pub fn parse_script(script: &str) -> Result<Vec<KeyPress>, ScriptError> {
    let mut presses: Vec<KeyPress> = Vec::new();

    for entry in script.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (time, combo) = entry
            .split_once(':')
            .ok_or_else(|| ScriptError::MissingTime(entry.to_string()))?;

        let time = time.trim();
        let millis: u64 = time
            .strip_suffix("ms")
            .unwrap_or(time)
            .parse()
            .map_err(|_| ScriptError::InvalidTime(entry.to_string()))?;
        let at = Duration::from_millis(millis);

        let combo = parse_combo(combo);
        if combo.is_keyless() {
            return Err(ScriptError::KeylessCombo(entry.to_string()));
        }

        if presses.last().is_some_and(|last| last.at > at) {
            return Err(ScriptError::OutOfOrder {
                entry: entry.to_string(),
            });
        }
        presses.push(KeyPress { at, combo });
    }

    Ok(presses)
}

/// Applies every binding of `file` and replays `presses`
///
/// Returns the actions fired, in the order they ran.
pub fn simulate(file: &BindingsFile, presses: &[KeyPress]) -> Result<Vec<Fired>, ConfigError> {
    let configured = file.parsed()?;

    let clock = Rc::new(VirtualScheduler::new());
    let window = LocalTarget::root("window");
    let element = LocalTarget::child(&window, "element");

    let mut binder = KeyBinder::new(window.clone(), clock.clone());
    if file.settings.view_transitions {
        binder = binder.with_view_transition(Rc::new(InlineTransition));
    }

    let fired = Rc::new(RefCell::new(Vec::new()));
    let bindings: Vec<Binding> = configured
        .iter()
        .map(|binding| {
            let fired = Rc::clone(&fired);
            let clock = Rc::clone(&clock);
            let action = binding.action.clone();
            binder.apply(BindRequest {
                element: element.clone(),
                key: binding.attribute.key.as_deref(),
                mods: &binding.attribute.mods,
                receiver: Rc::new(move |evt: Option<KeyboardEvent>| {
                    fired.borrow_mut().push(Fired {
                        at: clock.now(),
                        action: action.clone(),
                        key: evt.map(|e| e.key),
                    });
                }),
            })
        })
        .collect();

    for press in presses {
        clock.run_until(press.at);
        let keyboard = KeyboardEvent::from_combo(&press.combo);

        let mut down = Event::key_down(keyboard.clone());
        let allowed = element.dispatch(&mut down);
        element.dispatch(&mut Event::key_up(keyboard));

        tracing::debug!(
            at = ?press.at,
            combo = %press.combo,
            default_prevented = !allowed,
            "simulated key press"
        );
    }
    clock.run_until_idle();

    for binding in &bindings {
        binding.dispose();
    }

    let fired = fired.borrow().clone();
    Ok(fired)
}
