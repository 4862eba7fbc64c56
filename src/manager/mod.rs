// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device configuration, the device wrapper, and the process-wide registry.

mod device_config;
mod juno_device;
mod registry;

pub use device_config::{ConnectionConfig, DeviceConfig, DEFAULT_NAME};
pub use juno_device::JunoDevice;
pub use registry::DeviceRegistry;
