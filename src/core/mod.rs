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

//! src/core/mod.rs
//!
//! Core key-combination logic
//!
//! This module contains the data structures and algorithms that turn a
//! key specification into something an event can be tested against:
//! - Type definitions for combos, keyboard events and modifier sets
//! - Combo and attribute parsing
//! - Key name normalization
//! - Event matching
//! - Conflict detection and lint for configured bindings
//!
//! Nothing here touches event targets or timers, so it is all unit
//! testable in isolation.

pub mod conflict;
pub mod matcher;
pub mod normalize;
pub mod parser;
pub mod types;
pub mod validator;

pub use conflict::{BoundCombo, Conflict, ConflictDetector, Trigger};
pub use types::*;
pub use validator::{validate_attribute, ValidationIssue};

#[cfg(test)]
mod tests;
