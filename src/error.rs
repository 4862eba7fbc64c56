// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `juno_lib` library.
//!
//! This module provides the error hierarchy for failures across the library:
//! value validation, device communication, and registry lookups. Lock-file
//! contention is deliberately not represented here; the concurrency guard
//! logs and skips instead of surfacing a typed error.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when interacting
/// with an Atlona Juno switch.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during device communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Device was not found in the registry.
    #[error("device not found")]
    DeviceNotFound,
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u8,
        /// Maximum allowed value.
        max: u8,
        /// The actual value that was provided.
        actual: u8,
    },

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),
}

/// Errors related to telnet communication with the device.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An I/O operation on the control connection failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Command timed out.
    #[error("command timed out after {0} ms")]
    Timeout(u64),

    /// Login was rejected or the login prompt never arrived.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The device replied with something the protocol does not define.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid host, port, or connection URL.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 1,
            max: 4,
            actual: 7,
        };
        assert_eq!(err.to_string(), "value 7 is out of range [1, 4]");
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::InvalidPowerState("standby".to_string());
        let err: Error = value_err.into();
        assert!(matches!(err, Error::Value(ValueError::InvalidPowerState(_))));
    }

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::Timeout(5000);
        assert_eq!(err.to_string(), "command timed out after 5000 ms");

        let err = ProtocolError::UnexpectedResponse("x9AVx1".to_string());
        assert_eq!(err.to_string(), "unexpected response: x9AVx1");
    }

    #[test]
    fn error_from_protocol_error() {
        let err: Error = ProtocolError::AuthenticationFailed.into();
        assert_eq!(err.to_string(), "protocol error: authentication failed");
    }
}
