// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process-wide device registry.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::event::{DeviceEvent, DeviceId, EventBus};

use super::device_config::DeviceConfig;
use super::juno_device::JunoDevice;

/// Registry of Juno devices, deduplicated by connection identifier.
///
/// Adding a configuration whose connection identifier is already registered
/// returns the existing device instead of creating a second one, so two
/// platform entries pointing at the same switch share one state and one
/// guard.
///
/// The registry is cheap to clone; clones share the device map and the
/// event bus.
///
/// # Examples
///
/// ```no_run
/// use juno_lib::manager::{DeviceConfig, DeviceRegistry};
///
/// # async fn example() -> juno_lib::Result<()> {
/// let registry = DeviceRegistry::new();
///
/// let device = registry
///     .get_or_create(DeviceConfig::telnet("192.168.1.45"))
///     .await?;
/// let same = registry
///     .get_or_create(DeviceConfig::telnet("192.168.1.45"))
///     .await?;
/// assert!(std::sync::Arc::ptr_eq(&device, &same));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Arc<RwLock<HashMap<DeviceId, Arc<JunoDevice>>>>,
    event_bus: EventBus,
}

impl DeviceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given event bus capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            devices: Arc::new(RwLock::new(HashMap::new())),
            event_bus: EventBus::with_capacity(capacity),
        }
    }

    /// Returns the device for this configuration, creating it on first use.
    ///
    /// Deduplication is by [`DeviceConfig::connection_id`]: a second call
    /// with the same connection identifier returns the already registered
    /// device and ignores the rest of the new configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built from the
    /// configuration.
    pub async fn get_or_create(&self, config: DeviceConfig) -> Result<Arc<JunoDevice>> {
        let id = DeviceId::new(config.connection_id());

        if let Some(device) = self.devices.read().await.get(&id) {
            debug!(device_id = %id, "reusing registered device");
            return Ok(Arc::clone(device));
        }

        let mut devices = self.devices.write().await;
        // Re-check under the write lock; another task may have won the race.
        if let Some(device) = devices.get(&id) {
            return Ok(Arc::clone(device));
        }

        let device = Arc::new(JunoDevice::from_config_with_bus(
            config,
            self.event_bus.clone(),
        )?);
        devices.insert(id.clone(), Arc::clone(&device));
        info!(device_id = %id, name = device.name(), "device registered");

        self.event_bus.publish(DeviceEvent::device_added(id));
        Ok(device)
    }

    /// Returns a registered device by id.
    pub async fn get(&self, id: &DeviceId) -> Option<Arc<JunoDevice>> {
        self.devices.read().await.get(id).map(Arc::clone)
    }

    /// Removes a device from the registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] if no device with this id is
    /// registered.
    pub async fn remove(&self, id: &DeviceId) -> Result<()> {
        let removed = self.devices.write().await.remove(id);
        match removed {
            Some(_) => {
                info!(device_id = %id, "device removed");
                self.event_bus.publish(DeviceEvent::device_removed(id.clone()));
                Ok(())
            }
            None => Err(Error::DeviceNotFound),
        }
    }

    /// Returns the ids of all registered devices.
    pub async fn device_ids(&self) -> Vec<DeviceId> {
        self.devices.read().await.keys().cloned().collect()
    }

    /// Returns the number of registered devices.
    pub async fn device_count(&self) -> usize {
        self.devices.read().await.len()
    }

    /// Subscribes to events from the registry and all its devices.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_bus.subscribe()
    }

    /// Returns the number of active event subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.event_bus.subscriber_count()
    }
}
