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

//! View-transition wrapper
//!
//! When a binding asks for `viewtransition` and the host offers the
//! capability, every invocation runs inside the host's transition scope.
//! A missing capability is not an error: the callback is used as is.

use std::rc::Rc;

use crate::core::types::{options, ModifierSet};
use crate::timing::wrappers::Callback;

/// Host capability that runs an update inside a visual transition
pub trait ViewTransition {
    fn start_view_transition(&self, update: Box<dyn FnOnce()>);
}

/// Transition that runs the update straight away
///
/// Stands in for hosts without animation, e.g. the simulator.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineTransition;

impl ViewTransition for InlineTransition {
    fn start_view_transition(&self, update: Box<dyn FnOnce()>) {
        tracing::trace!("running update inside inline view transition");
        update();
    }
}

/// Wraps `callback` in `capability` if `mods` requests a view transition
pub fn modify_view_transition(
    callback: Callback,
    mods: &ModifierSet,
    capability: Option<&Rc<dyn ViewTransition>>,
) -> Callback {
    if !mods.has(options::VIEW_TRANSITION) {
        return callback;
    }

    let Some(capability) = capability else {
        tracing::debug!("view transitions unsupported by host, skipping wrapper");
        return callback;
    };

    let capability = Rc::clone(capability);
    Rc::new(move |evt| {
        let callback = Rc::clone(&callback);
        capability.start_view_transition(Box::new(move || callback(evt)));
    })
}
