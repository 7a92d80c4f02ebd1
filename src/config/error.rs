use std::path::PathBuf;
use thiserror::Error;

use crate::core::parser::ParseError;

/// Errors that can occur while loading a bindings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Bindings file does not exist.
    #[error("Bindings file not found: {0}")]
    NotFound(PathBuf),
    /// File is not valid TOML or does not match the expected layout.
    #[error("Invalid bindings file: {0}")]
    Toml(#[from] toml::de::Error),
    /// A `[[binding]]` entry has an attribute key that does not parse.
    #[error("Binding #{index}: {source}")]
    InvalidAttribute {
        index: usize,
        #[source]
        source: ParseError,
    },
    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
