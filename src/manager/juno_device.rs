// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device wrapper: polling, actions, and the host-facing surface.

use std::fmt;

use parking_lot::RwLock;
use tokio::sync::{Mutex, broadcast};
use tokio::time::Instant;
use tracing::debug;

use crate::client::{JunoClient, TelnetClient};
use crate::error::{Error, ProtocolError};
use crate::event::{DeviceEvent, DeviceId, EventBus};
use crate::guard::DeviceLock;
use crate::state::{DeviceState, SignalTransition, StateReconciler};
use crate::types::{PowerState, SourceInput, SupportedFeatures};

use super::device_config::{ConnectionConfig, DeviceConfig};

/// One Atlona Juno switch.
///
/// An external scheduler calls [`update`](Self::update) periodically; the
/// accessors read whatever the last poll stored. Actions issue exactly one
/// device command and leave the cached state alone; the next poll reflects
/// the change.
///
/// When a lock path is configured, `update` and every action run under the
/// [`DeviceLock`](crate::guard::DeviceLock), so at most one operation talks
/// to the device at a time, across cooperating processes. An operation that
/// cannot get the lock within the timeout is skipped silently.
///
/// # Examples
///
/// ```no_run
/// use juno_lib::manager::{DeviceConfig, JunoDevice};
/// use juno_lib::types::SourceInput;
///
/// # async fn example() -> juno_lib::Result<()> {
/// let config = DeviceConfig::telnet("192.168.1.45")
///     .with_credentials("admin", "Atlona")
///     .with_lock_path("/var/lock/atlonajuno");
/// let device = JunoDevice::from_config(config)?;
///
/// device.update().await?;
/// println!("power: {}, source: {:?}", device.power(), device.source());
///
/// device.select_source(SourceInput::new(2)?).await?;
/// # Ok(())
/// # }
/// ```
pub struct JunoDevice<C: JunoClient = TelnetClient> {
    id: DeviceId,
    name: String,
    client: C,
    guard: Option<DeviceLock>,
    reconciler: StateReconciler,
    state: RwLock<DeviceState>,
    /// Serializes `update` within the process; the file lock covers
    /// cross-process access.
    update_lock: Mutex<()>,
    event_bus: EventBus,
}

impl JunoDevice<TelnetClient> {
    /// Creates a device with a telnet client built from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection URL is invalid.
    pub fn from_config(config: DeviceConfig) -> Result<Self, Error> {
        Self::from_config_with_bus(config, EventBus::new())
    }

    /// Creates a device publishing on a shared event bus.
    pub(crate) fn from_config_with_bus(
        config: DeviceConfig,
        event_bus: EventBus,
    ) -> Result<Self, Error> {
        let client = match &config.connection {
            ConnectionConfig::Telnet {
                host,
                port,
                credentials,
            } => {
                let mut client = TelnetClient::new(host.clone(), *port);
                if let Some((username, password)) = credentials {
                    client = client.with_credentials(username, password);
                }
                client
            }
            ConnectionConfig::Url { url } => TelnetClient::from_url(url)?,
        };

        Ok(Self::with_client_and_bus(client, config, event_bus))
    }
}

impl<C: JunoClient> JunoDevice<C> {
    /// Creates a device around an existing client.
    ///
    /// Connection parameters in `config` are ignored beyond the connection
    /// identifier; the client is used as given.
    #[must_use]
    pub fn with_client(client: C, config: DeviceConfig) -> Self {
        Self::with_client_and_bus(client, config, EventBus::new())
    }

    fn with_client_and_bus(client: C, config: DeviceConfig, event_bus: EventBus) -> Self {
        let guard = config
            .lock_path
            .as_ref()
            .map(|path| DeviceLock::new(path).with_timeout(config.lock_timeout));

        Self {
            id: DeviceId::new(config.connection_id()),
            name: config.name,
            client,
            guard,
            reconciler: StateReconciler::new(config.debounce),
            state: RwLock::new(DeviceState::new()),
            update_lock: Mutex::new(()),
            event_bus,
        }
    }

    // =========================================================================
    // Polling
    // =========================================================================

    /// Refreshes the cached state from the device.
    ///
    /// Emits a signal event if this poll confirmed a transition. Under a
    /// configured guard, a poll that cannot get the device lock is skipped
    /// and returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// Device errors propagate to the scheduler, which is expected to mark
    /// the entity unavailable for this cycle and retry on the next one.
    pub async fn update(&self) -> Result<(), Error> {
        match &self.guard {
            Some(guard) => match guard.run(self.refresh_once()).await {
                Some(result) => result,
                None => Ok(()),
            },
            None => self.refresh_once().await,
        }
    }

    async fn refresh_once(&self) -> Result<(), Error> {
        let _update = self.update_lock.lock().await;

        let mut state = *self.state.read();
        let transition = self.reconciler.refresh(&self.client, &mut state).await?;
        *self.state.write() = state;

        if let Some(transition) = transition {
            let event = match transition {
                SignalTransition::Detected => DeviceEvent::signal_detected(self.id.clone()),
                SignalTransition::Lost => DeviceEvent::signal_lost(self.id.clone()),
            };
            debug!(device_id = %self.id, ?transition, "signal transition confirmed");
            self.event_bus.publish(event);
        }

        Ok(())
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Turns the switch on.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn turn_on(&self) -> Result<(), Error> {
        self.run_device_op(self.client.set_power_state(PowerState::On))
            .await?;
        Ok(())
    }

    /// Turns the switch off.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn turn_off(&self) -> Result<(), Error> {
        self.run_device_op(self.client.set_power_state(PowerState::Off))
            .await?;
        Ok(())
    }

    /// Selects an input source.
    ///
    /// Cached state is not touched; the next poll reflects the change. The
    /// switch time is recorded so the grace window suppresses the momentary
    /// signal drop that follows a source switch.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn select_source(&self, source: SourceInput) -> Result<(), Error> {
        let executed = self.run_device_op(self.client.set_source(source)).await?;
        if executed {
            self.state.write().mark_signal_change(Instant::now());
        }
        Ok(())
    }

    /// Runs one device command, guarded when a lock path is configured.
    ///
    /// Returns `Ok(false)` when the guard skipped the command.
    async fn run_device_op<F>(&self, op: F) -> Result<bool, Error>
    where
        F: Future<Output = Result<(), ProtocolError>>,
    {
        match &self.guard {
            Some(guard) => match guard.run(op).await {
                Some(result) => {
                    result?;
                    Ok(true)
                }
                None => Ok(false),
            },
            None => {
                op.await?;
                Ok(true)
            }
        }
    }

    // =========================================================================
    // Host platform surface
    // =========================================================================

    /// Returns the device id (the connection identifier).
    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the mapped power state from the last poll.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.state.read().power()
    }

    /// Returns the selected input from the last poll, if known.
    #[must_use]
    pub fn source(&self) -> Option<SourceInput> {
        self.state.read().source()
    }

    /// Returns the list of selectable inputs.
    #[must_use]
    pub fn source_list(&self) -> [SourceInput; 4] {
        SourceInput::ALL
    }

    /// Returns the feature bitmask exposed to the host platform.
    #[must_use]
    pub fn supported_features(&self) -> SupportedFeatures {
        SupportedFeatures::switch()
    }

    /// Returns the debounced signal flag.
    #[must_use]
    pub fn signal_detected(&self) -> bool {
        self.state.read().signal_detected()
    }

    /// Returns the raw signal reading from the last poll. This is the value
    /// exposed as a device attribute, current regardless of debounce state.
    #[must_use]
    pub fn signal_detected_raw(&self) -> bool {
        self.state.read().signal_detected_raw()
    }

    /// Returns a snapshot of the full device state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        *self.state.read()
    }

    /// Subscribes to this device's events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_bus.subscribe()
    }
}

impl<C: JunoClient> fmt::Debug for JunoDevice<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JunoDevice")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("guarded", &self.guard.is_some())
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;

    /// Records every command; readings are fixed.
    #[derive(Default)]
    struct RecordingClient {
        power: StdMutex<String>,
        signal: StdMutex<bool>,
        set_power_calls: StdMutex<Vec<PowerState>>,
        set_source_calls: StdMutex<Vec<u8>>,
    }

    impl RecordingClient {
        fn on_with_signal(signal: bool) -> Self {
            let client = Self::default();
            *client.power.lock().unwrap() = "on".to_string();
            *client.signal.lock().unwrap() = signal;
            client
        }
    }

    impl JunoClient for RecordingClient {
        async fn power_state(&self) -> Result<String, ProtocolError> {
            Ok(self.power.lock().unwrap().clone())
        }

        async fn source(&self) -> Result<SourceInput, ProtocolError> {
            Ok(SourceInput::new(1).unwrap())
        }

        async fn signal_detected(&self) -> Result<bool, ProtocolError> {
            Ok(*self.signal.lock().unwrap())
        }

        async fn set_power_state(&self, state: PowerState) -> Result<(), ProtocolError> {
            self.set_power_calls.lock().unwrap().push(state);
            Ok(())
        }

        async fn set_source(&self, source: SourceInput) -> Result<(), ProtocolError> {
            self.set_source_calls.lock().unwrap().push(source.value());
            Ok(())
        }
    }

    fn device(client: RecordingClient) -> JunoDevice<RecordingClient> {
        JunoDevice::with_client(client, DeviceConfig::telnet("192.168.1.45"))
    }

    #[test]
    fn fresh_device_exposes_defaults() {
        let device = device(RecordingClient::default());

        assert_eq!(device.name(), "atlonajuno");
        assert_eq!(device.id().as_str(), "192.168.1.45:23");
        assert_eq!(device.power(), PowerState::Off);
        assert!(device.source().is_none());
        assert_eq!(device.source_list(), SourceInput::ALL);
        assert_eq!(device.supported_features(), SupportedFeatures::switch());
    }

    #[tokio::test]
    async fn update_refreshes_cached_state() {
        let device = device(RecordingClient::on_with_signal(true));

        device.update().await.unwrap();

        assert_eq!(device.power(), PowerState::On);
        assert_eq!(device.source(), Some(SourceInput::new(1).unwrap()));
        assert!(device.signal_detected());
        assert!(device.signal_detected_raw());
    }

    #[tokio::test]
    async fn update_emits_signal_event() {
        let device = device(RecordingClient::on_with_signal(true));
        let mut events = device.subscribe();

        device.update().await.unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event, DeviceEvent::signal_detected(device.id().clone()));
    }

    #[tokio::test]
    async fn turn_on_issues_single_command_without_state_update() {
        let device = device(RecordingClient::default());

        device.turn_on().await.unwrap();

        let calls = device.client.set_power_calls.lock().unwrap().clone();
        assert_eq!(calls, vec![PowerState::On]);
        // State stays stale until the next poll
        assert_eq!(device.power(), PowerState::Off);
    }

    #[tokio::test]
    async fn turn_off_issues_single_command() {
        let device = device(RecordingClient::on_with_signal(false));

        device.turn_off().await.unwrap();

        let calls = device.client.set_power_calls.lock().unwrap().clone();
        assert_eq!(calls, vec![PowerState::Off]);
    }

    #[tokio::test]
    async fn select_source_issues_single_command_and_keeps_state() {
        let device = device(RecordingClient::default());

        device
            .select_source(SourceInput::new(2).unwrap())
            .await
            .unwrap();

        let calls = device.client.set_source_calls.lock().unwrap().clone();
        assert_eq!(calls, vec![2]);
        assert!(device.source().is_none(), "cached source must stay stale");
    }

    #[tokio::test(start_paused = true)]
    async fn select_source_anchors_grace_window() {
        let device = device(RecordingClient::default());

        device
            .select_source(SourceInput::new(3).unwrap())
            .await
            .unwrap();

        assert!(device.state().recently_switched(std::time::Duration::from_secs(60)));
    }
}
