// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device client for communicating with the Atlona Juno switch.
//!
//! The [`JunoClient`] trait is the seam between the state reconciler and the
//! wire: the reconciler and device operations are written against the trait,
//! and [`TelnetClient`] is the production implementation speaking the Juno's
//! line-oriented telnet control protocol.

mod telnet;

pub use telnet::TelnetClient;

use crate::error::ProtocolError;
use crate::types::{PowerState, SourceInput};

/// Trait for clients that can query and command a Juno switch.
#[allow(async_fn_in_trait)]
pub trait JunoClient {
    /// Queries the raw power state string (`"on"` or `"off"`).
    ///
    /// The raw string is returned unmapped; callers apply
    /// [`PowerState::from_raw`] so that the permissive mapping lives in
    /// exactly one place.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the query fails.
    async fn power_state(&self) -> Result<String, ProtocolError>;

    /// Queries the currently selected input.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the query fails or the reply names an
    /// input the switch does not have.
    async fn source(&self) -> Result<SourceInput, ProtocolError>;

    /// Queries whether a signal is present on the selected input.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the query fails.
    async fn signal_detected(&self) -> Result<bool, ProtocolError>;

    /// Sets the power state.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command fails.
    async fn set_power_state(&self, state: PowerState) -> Result<(), ProtocolError>;

    /// Selects an input source.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command fails.
    async fn set_source(&self, source: SourceInput) -> Result<(), ProtocolError>;
}
