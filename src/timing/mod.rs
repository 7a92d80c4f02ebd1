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

//! src/timing/mod.rs
//!
//! Callback wrapping: timers, timing policies and view transitions
//!
//! The binding controller composes a callback chain from these pieces:
//! the receiver is wrapped in a view transition first, then in the timing
//! policies, so a delayed or debounced effect still runs inside the
//! transition scope.

pub mod scheduler;
pub mod transition;
pub mod wrappers;

pub use scheduler::{Scheduler, TimerId, TimerKey, TimerScope, TokioScheduler, VirtualScheduler};
pub use transition::{modify_view_transition, InlineTransition, ViewTransition};
pub use wrappers::{
    debounce, delay, modify_timing, parse_wait, throttle, Callback, EdgeOptions, TimingOptions,
};

#[cfg(test)]
mod tests;
