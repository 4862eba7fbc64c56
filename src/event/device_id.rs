// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identifier type.

use std::fmt;

/// Identifier for a device, derived from its connection parameters.
///
/// The identifier is the connection identifier (`host:port` for telnet
/// devices, the URL for URL-configured devices), which is also the
/// deduplication key in the [`DeviceRegistry`](crate::manager::DeviceRegistry):
/// two configurations pointing at the same endpoint get the same id and the
/// same device instance.
///
/// # Examples
///
/// ```
/// use juno_lib::event::DeviceId;
///
/// let id = DeviceId::new("192.168.1.45:23");
/// assert_eq!(id.as_str(), "192.168.1.45:23");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a device identifier from a connection identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_endpoint_same_id() {
        let a = DeviceId::new("192.168.1.45:23");
        let b = DeviceId::from("192.168.1.45:23");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_endpoints_distinct_ids() {
        let a = DeviceId::new("192.168.1.45:23");
        let b = DeviceId::new("192.168.1.45:24");
        assert_ne!(a, b);
    }

    #[test]
    fn display_shows_connection_id() {
        let id = DeviceId::new("telnet://switch.local:23");
        assert_eq!(id.to_string(), "telnet://switch.local:23");
    }
}
