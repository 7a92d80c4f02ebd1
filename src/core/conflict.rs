//! Keybinding conflict detection
//!
//! Two bindings conflict when the same key press reaches both of them:
//! same combo (after key normalization, so `esc` and `escape` collide),
//! same event phase (keydown/keyup) and same target scope.
//!
//! # Performance
//! - Add binding: O(1) average case
//! - List all conflicts: O(n) where n = number of unique triggers

use std::collections::HashMap;
use std::fmt;

use crate::core::normalize::normalize_key;
use crate::core::types::{ComboModifiers, ComboSpec};

/// Where and when a binding listens
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Trigger {
    /// Listens for keyup instead of keydown
    pub up: bool,
    /// Listens on its own element instead of the window
    pub element: bool,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = if self.up { "keyup" } else { "keydown" };
        let scope = if self.element { "element" } else { "window" };
        write!(f, "{} on {}", phase, scope)
    }
}

/// One combo of a configured binding, with the action it runs
#[derive(Clone, Debug, PartialEq)]
pub struct BoundCombo {
    pub combo: ComboSpec,
    pub trigger: Trigger,
    pub action: String,
}

/// Normalized lookup key: canonical key identifier + modifiers + trigger
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct ConflictKey {
    key: String,
    modifiers: ComboModifiers,
    trigger: Trigger,
}

impl From<&BoundCombo> for ConflictKey {
    fn from(bound: &BoundCombo) -> Self {
        Self {
            key: normalize_key(&bound.combo.key),
            modifiers: bound.combo.modifiers,
            trigger: bound.trigger,
        }
    }
}

/// Detects combos claimed by more than one binding
///
/// Keyless combos are ignored: they never match, so they cannot collide.
#[derive(Default)]
pub struct ConflictDetector {
    bindings: HashMap<ConflictKey, Vec<BoundCombo>>,
}

/// A combo claimed by two or more bindings
#[derive(Clone, Debug, PartialEq)]
pub struct Conflict {
    /// The combo as written by the first binding that claimed it
    pub combo: ComboSpec,

    pub trigger: Trigger,

    /// All bindings using this combo (always 2 or more)
    pub conflicting_bindings: Vec<BoundCombo>,
}

impl ConflictDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_binding(&mut self, binding: BoundCombo) {
        if binding.combo.is_keyless() {
            return;
        }

        self.bindings
            .entry(ConflictKey::from(&binding))
            .or_default()
            .push(binding);
    }

    /// Finds all conflicts, ordered by the combo's display form
    pub fn find_conflicts(&self) -> Vec<Conflict> {
        let mut conflicts: Vec<Conflict> = self
            .bindings
            .values()
            .filter(|bindings| bindings.len() > 1)
            .map(|bindings| Conflict {
                combo: bindings[0].combo.clone(),
                trigger: bindings[0].trigger,
                conflicting_bindings: bindings.clone(),
            })
            .collect();

        conflicts.sort_by_key(|c| (c.combo.to_string(), c.trigger.up, c.trigger.element));
        conflicts
    }

    /// Checks if a specific combo/trigger pair has conflicts
    pub fn has_conflict(&self, combo: &ComboSpec, trigger: Trigger) -> bool {
        let key = ConflictKey {
            key: normalize_key(&combo.key),
            modifiers: combo.modifiers,
            trigger,
        };
        self.bindings
            .get(&key)
            .map(|bindings| bindings.len() > 1)
            .unwrap_or(false)
    }

    /// Returns the total number of combos tracked
    pub fn total_bindings(&self) -> usize {
        self.bindings.values().map(|b| b.len()).sum()
    }
}
