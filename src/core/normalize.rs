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

//! src/core/normalize.rs
//!
//! Key name normalization
//!
//! Maps the friendly names users write in combos ("esc", "space", "up")
//! to the identifiers keyboard events carry ("Escape", " ", "ArrowUp").

/// Aliases applied after capitalization
///
/// Keyed by the capitalized form so "ESC", "esc" and "Esc" all land here.
const KEY_ALIASES: &[(&str, &str)] = &[
    ("Space", " "),
    ("Return", "Enter"),
    ("Esc", "Escape"),
    ("Del", "Delete"),
    ("Pageup", "PageUp"),
    ("Pagedown", "PageDown"),
    ("Up", "ArrowUp"),
    ("Down", "ArrowDown"),
    ("Left", "ArrowLeft"),
    ("Right", "ArrowRight"),
];

/// Normalizes a base key to its keyboard-event identifier
///
/// - A single lower-case ASCII letter is returned unchanged
/// - Anything else is capitalized (first char upper, rest lower) and then
///   looked up in the alias table; unknown names pass through capitalized
///
/// # Example
/// ```
/// use on_keys::core::normalize::normalize_key;
///
/// assert_eq!(normalize_key("k"), "k");
/// assert_eq!(normalize_key("esc"), "Escape");
/// assert_eq!(normalize_key("enter"), "Enter");
/// assert_eq!(normalize_key("space"), " ");
/// ```
pub fn normalize_key(key: &str) -> String {
    if key.len() == 1 && key.bytes().all(|b| b.is_ascii_lowercase()) {
        return key.to_string();
    }

    let capitalized = capitalize(key);

    KEY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == capitalized)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(capitalized)
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
