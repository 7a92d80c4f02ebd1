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

//! src/core/parser.rs
//!
//! Key specification and attribute parser
//!
//! This module handles two levels of syntax:
//! - Combo tokens (`ctrl-shift-s`) and dot-separated combo lists
//!   (`esc.alt-q.enter`). These never fail: malformed input degrades to a
//!   combo with an empty key, which never matches.
//! - Attribute keys (`on-keys:ctrl-k__debounce.100ms.leading__el`) as
//!   written in markup or a bindings file. These are parsed with nom and
//!   report a `ParseError`, since they come from configuration.
//!
//! # Architecture
//! Combo parsing is a plain split: the grammar is too lenient to benefit
//! from combinators. The attribute grammar is:
//! ```text
//! attribute := ["data-"] "on-keys" [":" key] modifier*
//! modifier  := "__" name ("." tag)*
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    combinator::{all_consuming, opt, rest},
    multi::many0,
    sequence::preceded,
    IResult, Parser,
};
use thiserror::Error;

use crate::core::types::{ComboModifiers, ComboSpec, ComboSpecList, ModifierSet};

/// Plugin name an attribute key must start with
pub const PLUGIN_NAME: &str = "on-keys";

/// Separator between the modifier tokens of one combo
pub const COMBO_SEPARATOR: char = '-';

/// Separator between combos in a raw specification
pub const LIST_SEPARATOR: char = '.';

/// Attribute parse errors
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Not an on-keys attribute: '{0}'")]
    UnknownPlugin(String),

    #[error("Empty modifier name in attribute '{0}'")]
    EmptyModifier(String),

    #[error("Invalid attribute syntax '{input}': {message}")]
    InvalidSyntax { input: String, message: String },
}

/// A parsed attribute key
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeSpec {
    /// Raw key specification, `None` if the attribute had no `:` part
    pub key: Option<String>,

    /// Modifiers following the key
    pub mods: ModifierSet,
}

/// Parse a single combo token
///
/// Splits on `-`, lower-cases each part and recognizes modifier names.
/// The last non-modifier part becomes the key; if there is none the key is
/// empty. Never fails.
///
/// # Example
/// ```
/// use on_keys::core::parser::parse_combo;
///
/// let combo = parse_combo("alt-q");
/// assert_eq!(combo.key, "q");
/// assert!(combo.modifiers.alt);
/// assert!(!combo.modifiers.ctrl);
/// ```
pub fn parse_combo(token: &str) -> ComboSpec {
    let mut modifiers = ComboModifiers::NONE;
    let mut key = String::new();

    for part in token.split(COMBO_SEPARATOR) {
        let part = part.trim().to_lowercase();
        match part.as_str() {
            "ctrl" | "control" => modifiers.ctrl = true,
            "alt" => modifiers.alt = true,
            "shift" => modifiers.shift = true,
            "meta" | "cmd" | "command" => modifiers.meta = true,
            _ => key = part,
        }
    }

    ComboSpec { key, modifiers }
}

/// Parse a raw key specification into its combo list
///
/// `"esc.alt-q.enter"` → three combos. An empty (or blank) specification
/// yields an empty list, which matches any key.
pub fn parse_combo_list(raw: &str) -> ComboSpecList {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .map(parse_combo)
        .collect()
}

/// Parse an attribute key into key specification and modifiers
///
/// # Example
/// ```
/// use on_keys::core::parser::parse_attribute;
///
/// let spec = parse_attribute("on-keys:ctrl-k.esc__debounce.100ms.leading__el")?;
/// assert_eq!(spec.key.as_deref(), Some("ctrl-k.esc"));
/// assert!(spec.mods.has("el"));
/// assert!(spec.mods.tags("debounce").is_some_and(|t| t.contains("100ms")));
/// # Ok::<(), on_keys::core::parser::ParseError>(())
/// ```
pub fn parse_attribute(input: &str) -> Result<AttributeSpec, ParseError> {
    let trimmed = input.trim();

    let unprefixed = trimmed.strip_prefix("data-").unwrap_or(trimmed);
    if !unprefixed.starts_with(PLUGIN_NAME) {
        return Err(ParseError::UnknownPlugin(trimmed.to_string()));
    }

    let (_, (key, segments)) =
        all_consuming(attribute)
            .parse(trimmed)
            .map_err(|e| ParseError::InvalidSyntax {
                input: trimmed.to_string(),
                message: format!("{:?}", e),
            })?;

    let mut mods = ModifierSet::new();
    for segment in segments {
        let mut parts = segment.split(LIST_SEPARATOR);
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(ParseError::EmptyModifier(trimmed.to_string()));
        }
        mods.insert(name, parts.map(str::trim).filter(|t| !t.is_empty()));
    }

    Ok(AttributeSpec {
        key: key.map(str::to_string),
        mods,
    })
}

/// Full attribute: optional `data-` prefix, plugin name, key, modifiers
fn attribute(input: &str) -> IResult<&str, (Option<&str>, Vec<&str>)> {
    let (input, _) = opt(tag("data-")).parse(input)?;
    let (input, _) = tag(PLUGIN_NAME).parse(input)?;
    let (input, key) = opt(preceded(tag(":"), until_modifier)).parse(input)?;
    let (input, segments) = many0(preceded(tag("__"), until_modifier)).parse(input)?;

    Ok((input, (key, segments)))
}

/// Everything up to the next `__` (or the end of input)
fn until_modifier(input: &str) -> IResult<&str, &str> {
    alt((take_until("__"), rest)).parse(input)
}
