// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Domain value types for the Atlona Juno switch.

mod features;
mod power;
mod source;

pub use features::SupportedFeatures;
pub use power::PowerState;
pub use source::SourceInput;
