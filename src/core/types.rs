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

//! src/core/types.rs
//!
//! Core type definitions for key bindings
//!
//! This module defines the fundamental types used throughout the crate:
//! - `ComboModifiers`: The four modifier flags (ctrl, alt, shift, meta)
//! - `ComboSpec`: A base key plus its modifier flags
//! - `KeyboardEvent`: The observed input event a combo is matched against
//! - `ModifierSet`: Option names with their (possibly empty) tag sets
//!
//! All types are plain data. Parsing lives in `parser.rs`, matching in
//! `matcher.rs`.

use indexmap::IndexSet;
use std::collections::BTreeMap;
use std::fmt;

use crate::core::normalize::normalize_key;

/// Modifier flags declared by a combo or carried by an event
///
/// Absence of a modifier means "must be false" when matching, so this is
/// four plain booleans rather than a list.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ComboModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl ComboModifiers {
    /// No modifier held
    pub const NONE: ComboModifiers = ComboModifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl fmt::Display for ComboModifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (self.ctrl, "ctrl"),
            (self.alt, "alt"),
            (self.shift, "shift"),
            (self.meta, "meta"),
        ];
        let held = names
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join("-");
        write!(f, "{}", held)
    }
}

/// One parsed "base key + modifier flags" unit
///
/// Produced from a single dot-separated segment of a raw key specification,
/// e.g. `ctrl-shift-s`. The key is stored lower-case as written; it is
/// normalized only when compared against an event.
///
/// # Example
/// ```
/// use on_keys::core::parser::parse_combo;
///
/// let combo = parse_combo("ctrl-shift-s");
/// assert_eq!(combo.key, "s");
/// assert!(combo.modifiers.ctrl && combo.modifiers.shift);
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ComboSpec {
    /// Base key, lower-case (e.g. "k", "esc", "enter"); empty if malformed
    pub key: String,

    /// Modifiers that must be held (and all others must not be)
    pub modifiers: ComboModifiers,
}

impl ComboSpec {
    pub fn new(key: &str, modifiers: ComboModifiers) -> Self {
        Self {
            key: key.to_lowercase(),
            modifiers,
        }
    }

    /// True if parsing found no base key; such a spec never matches
    pub fn is_keyless(&self) -> bool {
        self.key.is_empty()
    }
}

impl fmt::Display for ComboSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}-{}", self.modifiers, self.key)
        }
    }
}

/// Ordered list of combos from one raw specification; empty = any key
pub type ComboSpecList = Vec<ComboSpec>;

/// The keyboard part of an input event
///
/// Mirrors the host keyboard-event contract: a key identifier in its
/// canonical form (`"Escape"`, `"ArrowUp"`, `"k"`, `" "`) and four
/// independent modifier flags.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeyboardEvent {
    pub key: String,
    pub ctrl_key: bool,
    pub alt_key: bool,
    pub shift_key: bool,
    pub meta_key: bool,
}

impl KeyboardEvent {
    /// Creates an event for `key` with no modifiers held
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: ComboModifiers) -> Self {
        self.ctrl_key = modifiers.ctrl;
        self.alt_key = modifiers.alt;
        self.shift_key = modifiers.shift;
        self.meta_key = modifiers.meta;
        self
    }

    /// Synthesizes the event a user pressing `combo` would produce
    pub fn from_combo(combo: &ComboSpec) -> Self {
        Self::new(&normalize_key(&combo.key)).with_modifiers(combo.modifiers)
    }

    pub fn modifiers(&self) -> ComboModifiers {
        ComboModifiers {
            ctrl: self.ctrl_key,
            alt: self.alt_key,
            shift: self.shift_key,
            meta: self.meta_key,
        }
    }
}

/// Option names understood by the binding controller
pub mod options {
    /// Listen on the element instead of the window
    pub const EL: &str = "el";
    /// Stop propagation of matched events
    pub const STOP: &str = "stop";
    /// Do not prevent the default action of matched events
    pub const NOPREVENT: &str = "noprevent";
    pub const CAPTURE: &str = "capture";
    pub const PASSIVE: &str = "passive";
    pub const ONCE: &str = "once";
    /// Listen for keyup instead of keydown
    pub const UP: &str = "up";
    /// Run the callback inside a view transition when supported
    pub const VIEW_TRANSITION: &str = "viewtransition";
    pub const DELAY: &str = "delay";
    pub const DEBOUNCE: &str = "debounce";
    pub const THROTTLE: &str = "throttle";

    /// Every option name the controller reacts to
    pub const ALL: &[&str] = &[
        EL,
        STOP,
        NOPREVENT,
        CAPTURE,
        PASSIVE,
        ONCE,
        UP,
        VIEW_TRANSITION,
        DELAY,
        DEBOUNCE,
        THROTTLE,
    ];
}

/// Option names and tags attached to a binding
///
/// A flat map from option name to its tag set. Presence-only options
/// (`el`, `stop`, `noprevent`, `capture`, `passive`, `once`, `up`,
/// `viewtransition`) carry an empty set; timing options (`delay`,
/// `debounce`, `throttle`) carry a magnitude and flags such as
/// `{"100ms", "leading"}`. Tags keep the order they were declared in, so
/// the first magnitude written is the one that counts.
///
/// # Example
/// ```
/// use on_keys::core::ModifierSet;
///
/// let mods = ModifierSet::new()
///     .with("el")
///     .with_tags("debounce", ["100ms", "leading"]);
/// assert!(mods.has("el"));
/// assert!(mods.tags("debounce").is_some_and(|t| t.contains("leading")));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ModifierSet {
    options: BTreeMap<String, IndexSet<String>>,
}

impl ModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a presence-only option
    pub fn with(mut self, name: &str) -> Self {
        self.insert(name, std::iter::empty::<&str>());
        self
    }

    /// Adds an option together with its tags
    pub fn with_tags<I, S>(mut self, name: &str, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(name, tags);
        self
    }

    /// Inserts an option, merging tags if it is already present
    ///
    /// Names and tags are lower-cased so lookups are case-insensitive.
    pub fn insert<I, S>(&mut self, name: &str, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.options.entry(name.to_lowercase()).or_default();
        entry.extend(tags.into_iter().map(|t| t.as_ref().to_lowercase()));
    }

    pub fn has(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Tag set of an option, `None` if the option is absent
    pub fn tags(&self, name: &str) -> Option<&IndexSet<String>> {
        self.options.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, tags) in &self.options {
            write!(f, "__{}", name)?;
            for tag in tags {
                write!(f, ".{}", tag)?;
            }
        }
        Ok(())
    }
}
