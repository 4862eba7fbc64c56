// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use super::DeviceId;

/// Events emitted by devices and the registry.
///
/// Signal events are the debounced transitions produced by the state
/// reconciler; lifecycle events track registry membership. Signal events
/// carry no payload beyond the device id, matching the host platform's bus
/// events.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum DeviceEvent {
    /// A device was added to the registry.
    DeviceAdded {
        /// The id of the added device.
        device_id: DeviceId,
    },

    /// A device was removed from the registry.
    DeviceRemoved {
        /// The id of the removed device.
        device_id: DeviceId,
    },

    /// A signal appeared on the selected input (debounced).
    SignalDetected {
        /// The id of the device.
        device_id: DeviceId,
    },

    /// The signal on the selected input was confirmed lost (debounced).
    SignalLost {
        /// The id of the device.
        device_id: DeviceId,
    },
}

impl DeviceEvent {
    /// Returns the device id associated with this event.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::DeviceAdded { device_id }
            | Self::DeviceRemoved { device_id }
            | Self::SignalDetected { device_id }
            | Self::SignalLost { device_id } => device_id,
        }
    }

    /// Returns `true` if this is a signal transition event.
    #[must_use]
    pub fn is_signal(&self) -> bool {
        matches!(self, Self::SignalDetected { .. } | Self::SignalLost { .. })
    }

    /// Returns the host platform's bus event type for signal events.
    #[must_use]
    pub fn bus_event_type(&self) -> Option<&'static str> {
        match self {
            Self::SignalDetected { .. } => Some("atlona_juno_signal_detected"),
            Self::SignalLost { .. } => Some("atlona_juno_signal_lost"),
            _ => None,
        }
    }

    /// Creates a device added event.
    #[must_use]
    pub fn device_added(device_id: DeviceId) -> Self {
        Self::DeviceAdded { device_id }
    }

    /// Creates a device removed event.
    #[must_use]
    pub fn device_removed(device_id: DeviceId) -> Self {
        Self::DeviceRemoved { device_id }
    }

    /// Creates a signal detected event.
    #[must_use]
    pub fn signal_detected(device_id: DeviceId) -> Self {
        Self::SignalDetected { device_id }
    }

    /// Creates a signal lost event.
    #[must_use]
    pub fn signal_lost(device_id: DeviceId) -> Self {
        Self::SignalLost { device_id }
    }
}
