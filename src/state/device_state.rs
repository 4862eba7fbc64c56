// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory state of a Juno switch.

use std::time::Duration;

use tokio::time::Instant;

use crate::types::{PowerState, SourceInput};

/// Tracked state of a Juno switch.
///
/// Owned by one device instance and overwritten wholesale on every poll.
/// Nothing here is persisted; a process restart loses the debounce counters
/// and starts fresh.
///
/// Two signal readings are kept side by side: `signal_detected_raw` is the
/// last raw reading from the device (exposed to the host as an attribute,
/// always current), while `signal_detected` is the debounced flag that only
/// changes on confirmed transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceState {
    /// Mapped power state.
    power: PowerState,
    /// Currently selected input, if known.
    source: Option<SourceInput>,
    /// Debounced signal flag.
    signal_detected: bool,
    /// Last raw signal reading.
    signal_detected_raw: bool,
    /// Consecutive no-signal readings while the debounced flag is still set.
    signal_loss_count: u32,
    /// When the signal state last changed for real (confirmed transition or
    /// issued source switch). Anchors the grace window.
    last_signal_change: Option<Instant>,
}

impl DeviceState {
    /// Creates a new empty device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mapped power state.
    #[must_use]
    pub const fn power(&self) -> PowerState {
        self.power
    }

    /// Sets the mapped power state.
    pub fn set_power(&mut self, power: PowerState) {
        self.power = power;
    }

    /// Returns the currently selected input, if known.
    #[must_use]
    pub const fn source(&self) -> Option<SourceInput> {
        self.source
    }

    /// Sets the currently selected input.
    pub fn set_source(&mut self, source: SourceInput) {
        self.source = Some(source);
    }

    /// Returns the debounced signal flag.
    #[must_use]
    pub const fn signal_detected(&self) -> bool {
        self.signal_detected
    }

    /// Sets the debounced signal flag.
    pub fn set_signal_detected(&mut self, detected: bool) {
        self.signal_detected = detected;
    }

    /// Returns the last raw signal reading.
    #[must_use]
    pub const fn signal_detected_raw(&self) -> bool {
        self.signal_detected_raw
    }

    /// Stores the raw signal reading.
    pub fn set_signal_detected_raw(&mut self, raw: bool) {
        self.signal_detected_raw = raw;
    }

    /// Returns the consecutive no-signal reading count.
    #[must_use]
    pub const fn signal_loss_count(&self) -> u32 {
        self.signal_loss_count
    }

    /// Increments the no-signal counter and returns the new count.
    pub fn increment_signal_loss(&mut self) -> u32 {
        self.signal_loss_count += 1;
        self.signal_loss_count
    }

    /// Resets the no-signal counter to zero.
    pub fn reset_signal_loss(&mut self) {
        self.signal_loss_count = 0;
    }

    /// Returns when the signal state last changed, if it ever has.
    #[must_use]
    pub const fn last_signal_change(&self) -> Option<Instant> {
        self.last_signal_change
    }

    /// Records a signal state change (or an issued source switch) at `now`.
    pub fn mark_signal_change(&mut self, now: Instant) {
        self.last_signal_change = Some(now);
    }

    /// Returns `true` if the last signal change is within the grace window.
    #[must_use]
    pub fn recently_switched(&self, grace_window: Duration) -> bool {
        self.last_signal_change
            .is_some_and(|changed| changed.elapsed() < grace_window)
    }
}
