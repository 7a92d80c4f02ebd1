//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Combo and attribute parsing tests
//! - Key normalization tests
//! - Matcher tests
//! - Conflict detection tests
//! - Type tests (ComboSpec, ModifierSet, etc.)

#[cfg(test)]
mod parser_tests;
