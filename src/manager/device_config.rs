// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::client::TelnetClient;
use crate::guard::DEFAULT_LOCK_TIMEOUT;
use crate::state::DebounceConfig;

/// Default display name for a configured device.
pub const DEFAULT_NAME: &str = "atlonajuno";

/// Configuration for a Juno device.
///
/// The three historical configuration variants (credentialed telnet, locked
/// telnet, URL-based) are one capability surface with different connection
/// parameters, so they share a single config type with a pluggable
/// [`ConnectionConfig`].
///
/// # Examples
///
/// ```
/// use juno_lib::manager::DeviceConfig;
///
/// // Credentialed telnet, default port 23
/// let config = DeviceConfig::telnet("192.168.1.45")
///     .with_credentials("admin", "Atlona")
///     .with_name("living room switch");
///
/// // URL-based, with the device guarded by a lock file
/// let config = DeviceConfig::url("telnet://192.168.1.45:23")
///     .with_lock_path("/var/lock/atlonajuno");
/// ```
#[derive(Debug, Clone)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct DeviceConfig {
    /// The connection configuration.
    pub connection: ConnectionConfig,
    /// Display name for the device.
    pub name: String,
    /// Lock file path; `None` disables the concurrency guard.
    pub lock_path: Option<PathBuf>,
    /// Maximum wait for the device lock.
    pub lock_timeout: Duration,
    /// Signal debounce tuning.
    pub debounce: DebounceConfig,
}

impl DeviceConfig {
    /// Creates a telnet configuration for a host, on the default port,
    /// without credentials.
    #[must_use]
    pub fn telnet(host: impl Into<String>) -> Self {
        Self {
            connection: ConnectionConfig::Telnet {
                host: host.into(),
                port: TelnetClient::DEFAULT_PORT,
                credentials: None,
            },
            name: DEFAULT_NAME.to_string(),
            lock_path: None,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            debounce: DebounceConfig::default(),
        }
    }

    /// Creates a URL-based configuration.
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            connection: ConnectionConfig::Url { url: url.into() },
            name: DEFAULT_NAME.to_string(),
            lock_path: None,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            debounce: DebounceConfig::default(),
        }
    }

    /// Sets telnet login credentials.
    ///
    /// Only applicable to telnet connections.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        if let ConnectionConfig::Telnet { credentials, .. } = &mut self.connection {
            *credentials = Some((username.into(), password.into()));
        }
        self
    }

    /// Sets the telnet control port.
    ///
    /// Only applicable to telnet connections.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        if let ConnectionConfig::Telnet { port: p, .. } = &mut self.connection {
            *p = port;
        }
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enables the concurrency guard with the given lock file path.
    #[must_use]
    pub fn with_lock_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_path = Some(path.into());
        self
    }

    /// Sets the maximum wait for the device lock.
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Sets the signal debounce tuning.
    #[must_use]
    pub fn with_debounce(mut self, debounce: DebounceConfig) -> Self {
        self.debounce = debounce;
        self
    }

    /// Returns the connection identifier this device is deduplicated on.
    #[must_use]
    pub fn connection_id(&self) -> String {
        self.connection.connection_id()
    }

    /// Returns `true` if device operations run under the concurrency guard.
    #[must_use]
    pub fn is_guarded(&self) -> bool {
        self.lock_path.is_some()
    }
}

/// Connection configuration for a device.
#[derive(Debug, Clone)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum ConnectionConfig {
    /// Telnet connection, with or without login.
    Telnet {
        /// The device host or IP address.
        host: String,
        /// The control port (default 23).
        port: u16,
        /// Optional (username, password) for the login handshake.
        credentials: Option<(String, String)>,
    },
    /// Connection described by a single URL, e.g. `telnet://host:23`.
    Url {
        /// The connection URL.
        url: String,
    },
}

impl ConnectionConfig {
    /// Returns the identifier used to deduplicate devices: `host:port` for
    /// telnet connections, the URL itself for URL-based ones.
    #[must_use]
    pub fn connection_id(&self) -> String {
        match self {
            Self::Telnet { host, port, .. } => format!("{host}:{port}"),
            Self::Url { url } => url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telnet_config_defaults() {
        let config = DeviceConfig::telnet("192.168.1.45");

        assert_eq!(config.name, DEFAULT_NAME);
        assert!(!config.is_guarded());

        if let ConnectionConfig::Telnet {
            host,
            port,
            credentials,
        } = &config.connection
        {
            assert_eq!(host, "192.168.1.45");
            assert_eq!(*port, 23);
            assert!(credentials.is_none());
        } else {
            panic!("expected telnet config");
        }
    }

    #[test]
    fn connection_id_is_host_and_port() {
        let config = DeviceConfig::telnet("192.168.1.45").with_port(2323);
        assert_eq!(config.connection_id(), "192.168.1.45:2323");
    }

    #[test]
    fn connection_id_is_url_for_url_config() {
        let config = DeviceConfig::url("telnet://switch.local:23");
        assert_eq!(config.connection_id(), "telnet://switch.local:23");
    }

    #[test]
    fn credentials_only_apply_to_telnet() {
        let config = DeviceConfig::url("telnet://host").with_credentials("user", "pass");
        assert!(matches!(config.connection, ConnectionConfig::Url { .. }));

        let config = DeviceConfig::telnet("host").with_credentials("user", "pass");
        if let ConnectionConfig::Telnet { credentials, .. } = &config.connection {
            assert_eq!(credentials, &Some(("user".to_string(), "pass".to_string())));
        } else {
            panic!("expected telnet config");
        }
    }

    #[test]
    fn lock_path_enables_guard() {
        let config = DeviceConfig::telnet("host").with_lock_path("/var/lock/atlonajuno");
        assert!(config.is_guarded());
        assert_eq!(
            config.lock_path.as_deref(),
            Some(std::path::Path::new("/var/lock/atlonajuno"))
        );
    }

    #[test]
    fn builder_options() {
        let config = DeviceConfig::telnet("host")
            .with_name("hdmi switch")
            .with_lock_timeout(Duration::from_secs(30))
            .with_debounce(DebounceConfig::new().with_loss_threshold(5));

        assert_eq!(config.name, "hdmi switch");
        assert_eq!(config.lock_timeout, Duration::from_secs(30));
        assert_eq!(config.debounce.loss_threshold, 5);
    }
}
