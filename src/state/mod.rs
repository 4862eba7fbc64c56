// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking and the poll/debounce reconciler.

mod device_state;
mod reconciler;

pub use device_state::DeviceState;
pub use reconciler::{DebounceConfig, SignalTransition, StateReconciler};
