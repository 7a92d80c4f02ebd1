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

//! Lint for bindings that would silently never (or always) fire
//!
//! Binding never reports errors: a combo without a key just never matches,
//! an unknown modifier is ignored, a timing option without a magnitude
//! waits 0ms. That keeps UI wiring resilient but hides mistakes, so this
//! module surfaces them for the `check` command.
//!
//! # Philosophy
//! We use a WHITELIST of modifier names the controller understands rather
//! than guessing at typos. Anything outside it is reported.

use thiserror::Error;

use crate::core::parser::{parse_combo_list, AttributeSpec};
use crate::core::types::options;
use crate::timing::wrappers::{EdgeOptions, TimingOptions};

/// Things worth telling the author of a binding
#[derive(Debug, Error, PartialEq)]
pub enum ValidationIssue {
    /// Combo has modifiers but no base key, e.g. `ctrl-`
    #[error("Combo '{0}' has no base key and will never match")]
    KeylessCombo(String),

    /// Modifier name not in whitelist
    #[error("Unknown modifier '{0}' is ignored")]
    UnknownModifier(String),

    /// Timing option without a usable magnitude
    #[error("Timing option '{0}' has no duration and waits 0ms")]
    ZeroWait(String),

    /// Debounce with `notrailing` and no `leading`, or throttle with
    /// `noleading` and no `trailing`
    #[error("Timing option '{0}' has neither edge enabled and never fires")]
    NeverFires(String),

    /// Empty or missing key specification
    #[error("No key filter: binding fires on every key")]
    MatchesAnyKey,
}

/// Validates a modifier name against the whitelist
pub fn validate_modifier(name: &str) -> Result<(), ValidationIssue> {
    if options::ALL.contains(&name) {
        Ok(())
    } else {
        Err(ValidationIssue::UnknownModifier(name.to_string()))
    }
}

/// Collects every issue found in a parsed attribute
pub fn validate_attribute(spec: &AttributeSpec) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let combos = spec
        .key
        .as_deref()
        .map(parse_combo_list)
        .unwrap_or_default();

    if combos.is_empty() {
        issues.push(ValidationIssue::MatchesAnyKey);
    }
    for (token, combo) in spec
        .key
        .as_deref()
        .unwrap_or_default()
        .split('.')
        .zip(&combos)
    {
        if combo.is_keyless() {
            issues.push(ValidationIssue::KeylessCombo(token.trim().to_string()));
        }
    }

    for name in spec.mods.names() {
        if let Err(issue) = validate_modifier(name) {
            issues.push(issue);
        }
    }

    let timing = TimingOptions::from_modifiers(&spec.mods);
    if timing.delay.is_some_and(|wait| wait.is_zero()) {
        issues.push(ValidationIssue::ZeroWait(options::DELAY.to_string()));
    }
    check_edges(options::DEBOUNCE, timing.debounce, &mut issues);
    check_edges(options::THROTTLE, timing.throttle, &mut issues);

    issues
}

fn check_edges(name: &str, edges: Option<EdgeOptions>, issues: &mut Vec<ValidationIssue>) {
    let Some(edges) = edges else {
        return;
    };

    if edges.wait.is_zero() {
        issues.push(ValidationIssue::ZeroWait(name.to_string()));
    }
    if edges.never_fires() {
        issues.push(ValidationIssue::NeverFires(name.to_string()));
    }
}
