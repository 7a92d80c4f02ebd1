//! Bindings file loading and checking.
//!
//! A bindings file declares which attribute keys are wired to which named
//! actions, the same way a page would carry `data-on-keys` attributes:
//!
//! ```toml
//! [settings]
//! view_transitions = true
//!
//! [[binding]]
//! attribute = "on-keys:ctrl-s__throttle.500ms"
//! action = "save"
//!
//! [[binding]]
//! attribute = "on-keys:esc__el"
//! action = "close-dialog"
//! ```
//!
//! Every attribute is parsed when the file is loaded, so a file that loads
//! is a file whose bindings can all be applied.
//!
//! # Example
//!
//! ```
//! use on_keys::config::BindingsFile;
//!
//! let file = BindingsFile::from_toml_str(r#"
//!     [[binding]]
//!     attribute = "on-keys:ctrl-k"
//!     action = "search"
//! "#)?;
//!
//! let bindings = file.parsed()?;
//! assert_eq!(bindings[0].action, "search");
//! assert!(file.check()?.is_clean());
//! # Ok::<(), on_keys::config::ConfigError>(())
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::parser::{parse_attribute, parse_combo_list, AttributeSpec};
use crate::core::types::{options, ComboSpecList};
use crate::core::{validate_attribute, BoundCombo, Conflict, ConflictDetector, Trigger, ValidationIssue};

mod error;

pub use error::ConfigError;

/// File-wide settings.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Whether the host supports view transitions.
    pub view_transitions: bool,
}

/// One `[[binding]]` table.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BindingEntry {
    /// Attribute key, e.g. `data-on-keys:esc__el`.
    pub attribute: String,
    /// Name of the action the binding triggers.
    pub action: String,
}

/// Contents of a bindings file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct BindingsFile {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default, rename = "binding")]
    pub bindings: Vec<BindingEntry>,
}

impl BindingsFile {
    /// Reads and parses the file at `path`.
    ///
    /// Fails with [`ConfigError::NotFound`] if it does not exist and with
    /// [`ConfigError::InvalidAttribute`] on the first attribute that does
    /// not parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let file = Self::from_toml_str(&content)?;

        tracing::info!(
            path = %path.display(),
            bindings = file.bindings.len(),
            "loaded bindings file"
        );
        Ok(file)
    }

    /// Parses a bindings file from a string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: Self = toml::from_str(content)?;
        file.parsed()?;

        if file.bindings.is_empty() {
            tracing::warn!("bindings file declares no bindings");
        }
        Ok(file)
    }

    /// Parses every attribute, in file order.
    pub fn parsed(&self) -> Result<Vec<ConfiguredBinding>, ConfigError> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let attribute = parse_attribute(&entry.attribute)
                    .map_err(|source| ConfigError::InvalidAttribute { index, source })?;
                Ok(ConfiguredBinding {
                    index,
                    action: entry.action.clone(),
                    attribute,
                })
            })
            .collect()
    }

    /// Runs conflict detection and lint over every binding.
    pub fn check(&self) -> Result<CheckReport, ConfigError> {
        let bindings = self.parsed()?;

        let mut detector = ConflictDetector::new();
        let mut issues = Vec::new();
        for binding in &bindings {
            for bound in binding.bound_combos() {
                detector.add_binding(bound);
            }
            for issue in validate_attribute(&binding.attribute) {
                tracing::warn!(action = %binding.action, %issue, "binding lint");
                issues.push((binding.index, issue));
            }
        }

        Ok(CheckReport {
            total: bindings.len(),
            conflicts: detector.find_conflicts(),
            issues,
        })
    }
}

/// A bindings-file entry with its attribute parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfiguredBinding {
    /// Position in the file, zero-based.
    pub index: usize,
    pub action: String,
    pub attribute: AttributeSpec,
}

impl ConfiguredBinding {
    /// Parsed combo list; empty when the binding matches any key.
    pub fn combos(&self) -> ComboSpecList {
        self.attribute
            .key
            .as_deref()
            .map(parse_combo_list)
            .unwrap_or_default()
    }

    pub fn trigger(&self) -> Trigger {
        Trigger {
            up: self.attribute.mods.has(options::UP),
            element: self.attribute.mods.has(options::EL),
        }
    }

    /// One entry per combo, for conflict detection.
    pub fn bound_combos(&self) -> Vec<BoundCombo> {
        let trigger = self.trigger();
        self.combos()
            .into_iter()
            .map(|combo| BoundCombo {
                combo,
                trigger,
                action: self.action.clone(),
            })
            .collect()
    }
}

/// Result of [`BindingsFile::check`].
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Number of bindings checked.
    pub total: usize,
    pub conflicts: Vec<Conflict>,
    /// Lint issues with the index of the binding they belong to.
    pub issues: Vec<(usize, ValidationIssue)>,
}

impl CheckReport {
    /// True when there are neither conflicts nor lint issues.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests;
