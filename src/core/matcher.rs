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

//! src/core/matcher.rs
//!
//! Matches observed keyboard events against parsed combos.
//!
//! Modifiers are exact-match: a combo without `shift` does not match an
//! event with shift held.

use crate::core::normalize::normalize_key;
use crate::core::types::{ComboSpec, KeyboardEvent};

/// Returns true if `event` is exactly the combo described by `spec`
///
/// # Example
/// ```
/// use on_keys::core::{matcher::matches, parser::parse_combo, KeyboardEvent};
///
/// let alt_q = parse_combo("alt-q");
/// let mut event = KeyboardEvent::new("q");
/// assert!(!matches(&event, &alt_q));
///
/// event.alt_key = true;
/// assert!(matches(&event, &alt_q));
/// ```
pub fn matches(event: &KeyboardEvent, spec: &ComboSpec) -> bool {
    if spec.is_keyless() || event.key != normalize_key(&spec.key) {
        return false;
    }

    event.modifiers() == spec.modifiers
}

/// Returns true if any combo matches, or if there are no combos at all
///
/// An empty list means no key filter was declared, so every key triggers.
pub fn matches_any(event: &KeyboardEvent, specs: &[ComboSpec]) -> bool {
    specs.is_empty() || specs.iter().any(|spec| matches(event, spec))
}
