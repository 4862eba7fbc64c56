// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Juno Lib - A Rust library to control Atlona Juno 451 HDMI switches.
//!
//! This library drives the Juno 451 over its telnet control port and exposes
//! it as a source-selectable media device: poll the switch for its power,
//! input, and signal state, and send power and input-selection commands.
//!
//! # Supported Features
//!
//! - **Power control**: Turn the switch on and off
//! - **Source selection**: Select one of the four HDMI inputs
//! - **State polling**: Power state, selected input, input signal presence
//! - **Signal debounce**: Confirmed signal-loss events, with a grace window
//!   after source switches so momentary drops are not reported
//! - **Concurrency guard**: An advisory file lock serializes device access
//!   across processes, with a settle delay after contended acquisitions
//!
//! # Quick Start
//!
//! ```no_run
//! use juno_lib::manager::{DeviceConfig, DeviceRegistry};
//! use juno_lib::types::SourceInput;
//!
//! #[tokio::main]
//! async fn main() -> juno_lib::Result<()> {
//!     let registry = DeviceRegistry::new();
//!
//!     // Devices are deduplicated by host:port; a second entry for the
//!     // same switch returns the same device.
//!     let device = registry
//!         .get_or_create(
//!             DeviceConfig::telnet("192.168.1.45")
//!                 .with_credentials("admin", "Atlona")
//!                 .with_lock_path("/var/lock/atlonajuno"),
//!         )
//!         .await?;
//!
//!     device.update().await?;
//!     println!("power: {}, source: {:?}", device.power(), device.source());
//!
//!     device.select_source(SourceInput::new(2)?).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Signal Events
//!
//! Confirmed signal transitions are broadcast on an event bus:
//!
//! ```no_run
//! use juno_lib::manager::{DeviceConfig, DeviceRegistry};
//!
//! #[tokio::main]
//! async fn main() -> juno_lib::Result<()> {
//!     let registry = DeviceRegistry::new();
//!     let mut events = registry.subscribe();
//!
//!     let device = registry
//!         .get_or_create(DeviceConfig::telnet("192.168.1.45"))
//!         .await?;
//!     device.update().await?;
//!
//!     while let Ok(event) = events.recv().await {
//!         if let Some(event_type) = event.bus_event_type() {
//!             println!("{}: {}", event_type, event.device_id());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod event;
pub mod guard;
pub mod manager;
pub mod state;
pub mod types;

pub use client::{JunoClient, TelnetClient};
pub use error::{Error, ProtocolError, Result, ValueError};
pub use event::{DeviceEvent, DeviceId, EventBus};
pub use guard::DeviceLock;
pub use manager::{ConnectionConfig, DeviceConfig, DeviceRegistry, JunoDevice, DEFAULT_NAME};
pub use state::{DebounceConfig, DeviceState, SignalTransition, StateReconciler};
pub use types::{PowerState, SourceInput, SupportedFeatures};
