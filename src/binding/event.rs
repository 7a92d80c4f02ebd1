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

//! Dispatched events and listener options
//!
//! An [`Event`] is what a target hands to its listeners. Keyboard events
//! carry a [`KeyboardEvent`] payload; events of a keyboard type without a
//! payload (e.g. synthetic ones) carry `None` and are ignored by bindings.

use std::fmt;

use crate::core::types::KeyboardEvent;

/// Event types a binding can listen for
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EventType {
    KeyDown,
    KeyUp,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::KeyDown => "keydown",
            EventType::KeyUp => "keyup",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options a listener is registered with
///
/// Removal must pass the same `capture` flag that registration used.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ListenerOptions {
    /// Run during the capture phase
    pub capture: bool,
    /// The listener promises not to prevent the default action
    pub passive: bool,
    /// Remove the listener after its first invocation
    pub once: bool,
}

/// An event travelling through a target tree
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    kind: EventType,
    keyboard: Option<KeyboardEvent>,
    default_prevented: bool,
    propagation_stopped: bool,
    in_passive_listener: bool,
}

impl Event {
    pub fn new(kind: EventType, keyboard: Option<KeyboardEvent>) -> Self {
        Self {
            kind,
            keyboard,
            default_prevented: false,
            propagation_stopped: false,
            in_passive_listener: false,
        }
    }

    pub fn key_down(keyboard: KeyboardEvent) -> Self {
        Self::new(EventType::KeyDown, Some(keyboard))
    }

    pub fn key_up(keyboard: KeyboardEvent) -> Self {
        Self::new(EventType::KeyUp, Some(keyboard))
    }

    pub fn kind(&self) -> EventType {
        self.kind
    }

    /// Keyboard payload, `None` for non-keyboard events
    pub fn keyboard(&self) -> Option<&KeyboardEvent> {
        self.keyboard.as_ref()
    }

    /// Marks the default action as cancelled
    ///
    /// Ignored while a passive listener is running.
    pub fn prevent_default(&mut self) {
        if !self.in_passive_listener {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stops the event from reaching further targets in the tree
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub(crate) fn set_in_passive_listener(&mut self, passive: bool) {
        self.in_passive_listener = passive;
    }
}
