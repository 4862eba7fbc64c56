// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The poll/debounce state reconciler.
//!
//! On every poll the reconciler rebuilds the device state from fresh
//! readings and folds the noisy raw signal flag into a debounced one:
//!
//! - A signal **gain** is trusted immediately; the switch never claims a
//!   signal it does not have.
//! - A signal **loss** must survive three consecutive polls before it is
//!   believed, and is ignored entirely inside the grace window right after
//!   a source switch (switching interrupts the signal momentarily).
//!
//! The grace window anchors to the last *confirmed* signal change: the
//! timestamp is updated on debounced gain, on debounced loss, and when a
//! source switch is issued.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::client::JunoClient;
use crate::error::ProtocolError;
use crate::types::PowerState;

use super::DeviceState;

/// A confirmed signal transition produced by one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalTransition {
    /// A signal appeared on the selected input.
    Detected,
    /// The signal was confirmed lost.
    Lost,
}

/// Tuning for the signal debounce logic.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use juno_lib::state::DebounceConfig;
///
/// // Defaults: 3 consecutive misses, 60 second grace window
/// let config = DebounceConfig::default();
///
/// let config = DebounceConfig::new()
///     .with_loss_threshold(5)
///     .with_grace_window(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct DebounceConfig {
    /// Consecutive no-signal polls required before a loss is believed.
    pub loss_threshold: u32,
    /// Post-switch interval during which loss readings are ignored.
    pub grace_window: Duration,
}

impl DebounceConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the consecutive-miss threshold.
    #[must_use]
    pub fn with_loss_threshold(mut self, threshold: u32) -> Self {
        self.loss_threshold = threshold;
        self
    }

    /// Sets the post-switch grace window.
    #[must_use]
    pub fn with_grace_window(mut self, window: Duration) -> Self {
        self.grace_window = window;
        self
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            loss_threshold: 3,
            grace_window: Duration::from_secs(60),
        }
    }
}

/// Rebuilds a [`DeviceState`] from device readings, one poll at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateReconciler {
    config: DebounceConfig,
}

impl StateReconciler {
    /// Creates a reconciler with the given debounce tuning.
    #[must_use]
    pub fn new(config: DebounceConfig) -> Self {
        Self { config }
    }

    /// Returns the debounce tuning.
    #[must_use]
    pub const fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// Refreshes `state` from the device and returns a confirmed signal
    /// transition, if this poll produced one.
    ///
    /// Power is queried first; when the device is off, the signal logic is
    /// skipped entirely. The current source is re-queried and stored in
    /// every case. At most one transition can occur per poll, and a
    /// transition is reported exactly once.
    ///
    /// # Errors
    ///
    /// Device errors propagate unchanged; the external scheduler is expected
    /// to mark the entity unavailable for the cycle and retry on the next
    /// poll.
    pub async fn refresh<C: JunoClient>(
        &self,
        client: &C,
        state: &mut DeviceState,
    ) -> Result<Option<SignalTransition>, ProtocolError> {
        let raw_power = client.power_state().await?;
        let power = PowerState::from_raw(&raw_power);
        state.set_power(power);

        let mut transition = None;
        if power.is_on() {
            transition = self.debounce_signal(client.signal_detected().await?, state);
        }

        state.set_source(client.source().await?);

        debug!(
            power = %state.power(),
            source = ?state.source().map(|s| s.value()),
            signal_raw = state.signal_detected_raw(),
            signal = state.signal_detected(),
            loss_count = state.signal_loss_count(),
            "poll complete"
        );

        Ok(transition)
    }

    /// Folds one raw signal reading into the debounced flag.
    fn debounce_signal(&self, raw: bool, state: &mut DeviceState) -> Option<SignalTransition> {
        // The raw reading is always stored: it is the attribute the host
        // platform sees, current regardless of debounce state.
        state.set_signal_detected_raw(raw);

        if raw {
            state.reset_signal_loss();
        }

        if raw == state.signal_detected() {
            return None;
        }

        if raw {
            // A gain is trusted on the very next poll.
            state.set_signal_detected(true);
            state.mark_signal_change(Instant::now());
            return Some(SignalTransition::Detected);
        }

        if state.recently_switched(self.config.grace_window) {
            debug!("no-signal reading within grace window; ignoring");
            return None;
        }

        let count = state.increment_signal_loss();
        if count >= self.config.loss_threshold {
            state.set_signal_detected(false);
            state.mark_signal_change(Instant::now());
            return Some(SignalTransition::Lost);
        }

        None
    }
}
