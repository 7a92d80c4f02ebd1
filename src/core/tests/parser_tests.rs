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

//! Parser module tests
//!
//! Tests for parsing key specifications and attribute keys:
//! - Single combos with and without modifiers
//! - Modifier aliases (control, cmd, command)
//! - Lenient handling of malformed combos
//! - Dot-separated combo lists
//! - Attribute keys with modifiers and tags

use crate::core::{
    parser::*,
    types::{ComboModifiers, ComboSpec},
};

#[test]
fn test_parse_plain_key() {
    let combo = parse_combo("escape");
    assert_eq!(combo.key, "escape");
    assert!(combo.modifiers.is_empty());
}

#[test]
fn test_parse_single_modifier() {
    assert_eq!(
        parse_combo("alt-q"),
        ComboSpec::new(
            "q",
            ComboModifiers {
                alt: true,
                ..ComboModifiers::NONE
            }
        )
    );
}

#[test]
fn test_parse_multiple_modifiers() {
    assert_eq!(
        parse_combo("ctrl-shift-s"),
        ComboSpec::new(
            "s",
            ComboModifiers {
                ctrl: true,
                shift: true,
                ..ComboModifiers::NONE
            }
        )
    );
}

#[test]
fn test_parse_modifier_aliases() {
    assert!(parse_combo("control-k").modifiers.ctrl);
    assert!(parse_combo("cmd-k").modifiers.meta);
    assert!(parse_combo("command-k").modifiers.meta);
    assert!(parse_combo("meta-k").modifiers.meta);
}

#[test]
fn test_parse_is_case_insensitive() {
    let combo = parse_combo("CTRL-Shift-Enter");
    assert_eq!(combo.key, "enter");
    assert!(combo.modifiers.ctrl);
    assert!(combo.modifiers.shift);
}

#[test]
fn test_parse_last_key_wins() {
    assert_eq!(parse_combo("a-b").key, "b");
    assert_eq!(parse_combo("ctrl-a-alt-b").key, "b");
}

#[test]
fn test_parse_modifier_only_is_keyless() {
    let combo = parse_combo("ctrl-shift");
    assert!(combo.is_keyless());
    assert!(combo.modifiers.ctrl);

    assert!(parse_combo("").is_keyless());
}

#[test]
fn test_parse_trailing_separator_is_keyless() {
    // The empty part after the dash replaces "k" as the key
    assert!(parse_combo("k-").is_keyless());
}

#[test]
fn test_parse_combo_list() {
    let combos = parse_combo_list("esc.alt-q.enter");
    assert_eq!(combos.len(), 3);
    assert_eq!(combos[0].key, "esc");
    assert_eq!(combos[1].key, "q");
    assert!(combos[1].modifiers.alt);
    assert_eq!(combos[2].key, "enter");
}

#[test]
fn test_parse_combo_list_trims_tokens() {
    let combos = parse_combo_list(" esc . ctrl-k ");
    assert_eq!(combos[0].key, "esc");
    assert_eq!(combos[1].key, "k");
    assert!(combos[1].modifiers.ctrl);
}

#[test]
fn test_parse_empty_combo_list() {
    assert!(parse_combo_list("").is_empty());
    assert!(parse_combo_list("   ").is_empty());
}

#[test]
fn test_parse_attribute_key_only() {
    let spec = parse_attribute("on-keys:escape").unwrap();
    assert_eq!(spec.key.as_deref(), Some("escape"));
    assert!(spec.mods.is_empty());
}

#[test]
fn test_parse_attribute_with_data_prefix() {
    let spec = parse_attribute("data-on-keys:ctrl-k").unwrap();
    assert_eq!(spec.key.as_deref(), Some("ctrl-k"));
}

#[test]
fn test_parse_attribute_without_key() {
    let spec = parse_attribute("on-keys__up").unwrap();
    assert_eq!(spec.key, None);
    assert!(spec.mods.has("up"));
}

#[test]
fn test_parse_attribute_modifiers_and_tags() {
    let spec = parse_attribute("on-keys:esc.alt-q__el__throttle.500ms.trailing__noprevent").unwrap();

    assert_eq!(spec.key.as_deref(), Some("esc.alt-q"));
    assert!(spec.mods.has("el"));
    assert!(spec.mods.has("noprevent"));

    let throttle = spec.mods.tags("throttle").unwrap();
    assert!(throttle.contains("500ms"));
    assert!(throttle.contains("trailing"));
    assert_eq!(throttle.len(), 2);
}

#[test]
fn test_parse_attribute_lowercases_modifiers() {
    let spec = parse_attribute("on-keys:k__Debounce.100MS").unwrap();
    assert!(spec.mods.tags("debounce").unwrap().contains("100ms"));
}

#[test]
fn test_parse_attribute_keeps_tag_order() {
    let spec = parse_attribute("on-keys:k__debounce.50.100ms").unwrap();
    let tags: Vec<&str> = spec
        .mods
        .tags("debounce")
        .unwrap()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(tags, vec!["50", "100ms"]);

    let timing = crate::timing::TimingOptions::from_modifiers(&spec.mods);
    assert_eq!(
        timing.debounce.map(|d| d.wait),
        Some(std::time::Duration::from_millis(50))
    );
}

#[test]
fn test_parse_attribute_rejects_other_plugins() {
    assert_eq!(
        parse_attribute("on-click__once"),
        Err(ParseError::UnknownPlugin("on-click__once".to_string()))
    );
}

#[test]
fn test_parse_attribute_rejects_empty_modifier() {
    assert!(matches!(
        parse_attribute("on-keys:k____el"),
        Err(ParseError::EmptyModifier(_))
    ));
}

#[test]
fn test_parse_attribute_rejects_trailing_garbage() {
    assert!(matches!(
        parse_attribute("on-keysx"),
        Err(ParseError::InvalidSyntax { .. })
    ));
}
