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

//! src/binding/mod.rs
//!
//! Listener registration: events, targets and the binding controller
//!
//! The controller only talks to targets through the [`EventTarget`]
//! trait; [`LocalTarget`] is the in-memory tree used for simulation and
//! tests.

pub mod controller;
pub mod event;
pub mod target;

pub use controller::{BatchHooks, BindRequest, Binding, BindingState, Disposer, KeyBinder};
pub use event::{Event, EventType, ListenerOptions};
pub use target::{EventTarget, Listener, LocalTarget};

#[cfg(test)]
mod tests;
