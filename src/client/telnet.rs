// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Telnet control-protocol client for the Juno 451.
//!
//! The switch's control daemon does not tolerate long-held sessions, so the
//! client opens a fresh TCP connection for every command, optionally logs in,
//! sends one CR-LF-terminated command, and reads the reply line. Serializing
//! commands across processes is the concurrency guard's job, not the client's.

use std::fmt;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::trace;

use crate::error::ProtocolError;
use crate::types::{PowerState, SourceInput};

use super::JunoClient;

/// Default timeout for a single command exchange.
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Telnet client for the Juno switch.
///
/// # Examples
///
/// ```
/// use juno_lib::client::TelnetClient;
///
/// // Credentialed telnet
/// let client = TelnetClient::new("192.168.1.45", 23)
///     .with_credentials("admin", "Atlona");
///
/// // URL-based configuration
/// let client = TelnetClient::from_url("telnet://192.168.1.45:23").unwrap();
/// ```
#[derive(Clone)]
pub struct TelnetClient {
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    command_timeout: Duration,
}

impl TelnetClient {
    /// Default telnet control port.
    pub const DEFAULT_PORT: u16 = 23;

    /// Creates a client for a host and port, without login credentials.
    ///
    /// This is the "locked telnet" variant: the control daemon accepts
    /// commands directly, with no login handshake.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            credentials: None,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Creates a client from a connection URL such as `telnet://host:23`.
    ///
    /// The scheme is optional; a missing port defaults to
    /// [`DEFAULT_PORT`](Self::DEFAULT_PORT).
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the URL has no host or a
    /// malformed port.
    pub fn from_url(url: &str) -> Result<Self, ProtocolError> {
        let rest = url.strip_prefix("telnet://").unwrap_or(url);
        let rest = rest.trim_end_matches('/');

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse()
                    .map_err(|_| ProtocolError::InvalidAddress(url.to_string()))?;
                (host, port)
            }
            None => (rest, Self::DEFAULT_PORT),
        };

        if host.is_empty() {
            return Err(ProtocolError::InvalidAddress(url.to_string()));
        }

        Ok(Self::new(host, port))
    }

    /// Sets login credentials for the credentialed telnet variant.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the per-command timeout.
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Returns the device host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the control port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Sends one command and returns the first matching reply line.
    ///
    /// The command echo is skipped unless the expected reply *is* the echo
    /// (set commands confirm by echoing the command back).
    async fn exchange(&self, command: &str, reply_prefix: &str) -> Result<String, ProtocolError> {
        let timeout_ms = u64::try_from(self.command_timeout.as_millis()).unwrap_or(u64::MAX);
        tokio::time::timeout(self.command_timeout, self.exchange_inner(command, reply_prefix))
            .await
            .map_err(|_| ProtocolError::Timeout(timeout_ms))?
    }

    async fn exchange_inner(
        &self,
        command: &str,
        reply_prefix: &str,
    ) -> Result<String, ProtocolError> {
        let mut stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| {
                ProtocolError::ConnectionFailed(format!("{}:{}: {e}", self.host, self.port))
            })?;

        if let Some((username, password)) = &self.credentials {
            login(&mut stream, username, password).await?;
        }

        trace!(command, "sending command");
        stream.write_all(command.as_bytes()).await?;
        stream.write_all(b"\r\n").await?;

        let mut acc = String::new();
        let mut buf = [0u8; 256];
        loop {
            // Only complete lines are scanned; the tail may be a partial read.
            if let Some(line) = complete_lines(&acc)
                .find(|line| line.starts_with(reply_prefix) && (reply_prefix == command || *line != command))
            {
                trace!(command, reply = line, "received reply");
                return Ok(line.to_string());
            }

            let n = stream.read(&mut buf).await?;
            if n == 0 {
                return Err(ProtocolError::UnexpectedResponse(acc.trim().to_string()));
            }
            acc.push_str(&String::from_utf8_lossy(&buf[..n]));
        }
    }
}

impl JunoClient for TelnetClient {
    async fn power_state(&self) -> Result<String, ProtocolError> {
        let reply = self.exchange("PWSTA", "PW").await?;
        parse_power_reply(&reply).map(ToString::to_string)
    }

    async fn source(&self) -> Result<SourceInput, ProtocolError> {
        let reply = self.exchange("Status", "x").await?;
        parse_status_reply(&reply)
    }

    async fn signal_detected(&self) -> Result<bool, ProtocolError> {
        // The InputStatus flags are per input, so the selected input decides
        // which flag is the signal reading.
        let source = self.source().await?;
        let reply = self.exchange("InputStatus", "InputStatus ").await?;
        parse_input_status(&reply, source)
    }

    async fn set_power_state(&self, state: PowerState) -> Result<(), ProtocolError> {
        let command = match state {
            PowerState::On => "PWON",
            PowerState::Off => "PWOFF",
        };
        self.exchange(command, command).await.map(|_| ())
    }

    async fn set_source(&self, source: SourceInput) -> Result<(), ProtocolError> {
        let command = format!("x{}AVx1", source.value());
        self.exchange(&command, &command).await.map(|_| ())
    }
}

impl fmt::Debug for TelnetClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelnetClient")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("authenticated", &self.credentials.is_some())
            .field("command_timeout", &self.command_timeout)
            .finish()
    }
}

/// Performs the username/password handshake on a fresh connection.
async fn login(
    stream: &mut TcpStream,
    username: &str,
    password: &str,
) -> Result<(), ProtocolError> {
    read_until(stream, "Username:").await?;
    stream.write_all(username.as_bytes()).await?;
    stream.write_all(b"\r\n").await?;

    read_until(stream, "Password:").await?;
    stream.write_all(password.as_bytes()).await?;
    stream.write_all(b"\r\n").await?;

    Ok(())
}

/// Reads until the prompt text appears in the stream.
async fn read_until(stream: &mut TcpStream, needle: &str) -> Result<(), ProtocolError> {
    let mut acc = String::new();
    let mut buf = [0u8; 256];
    while !acc.contains(needle) {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Err(ProtocolError::AuthenticationFailed);
        }
        acc.push_str(&String::from_utf8_lossy(&buf[..n]));
    }
    Ok(())
}

/// Iterates over the complete (newline-terminated) lines of the accumulator.
fn complete_lines(acc: &str) -> impl Iterator<Item = &str> {
    let complete = match acc.rfind('\n') {
        Some(idx) => &acc[..idx],
        None => "",
    };
    complete.lines().map(str::trim)
}

/// Maps a `PWSTA` reply to the raw power string.
fn parse_power_reply(reply: &str) -> Result<&'static str, ProtocolError> {
    match reply {
        "PWON" => Ok("on"),
        "PWOFF" => Ok("off"),
        other => Err(ProtocolError::UnexpectedResponse(other.to_string())),
    }
}

/// Parses a `Status` reply of the form `x<N>AVx1`.
fn parse_status_reply(reply: &str) -> Result<SourceInput, ProtocolError> {
    let unexpected = || ProtocolError::UnexpectedResponse(reply.to_string());

    let number = reply
        .strip_prefix('x')
        .and_then(|rest| rest.split_once("AV"))
        .map(|(number, _)| number)
        .ok_or_else(unexpected)?;

    let input: u8 = number.parse().map_err(|_| unexpected())?;
    SourceInput::new(input).map_err(|_| unexpected())
}

/// Parses an `InputStatus <flags>` reply, indexing the flag for `source`.
fn parse_input_status(reply: &str, source: SourceInput) -> Result<bool, ProtocolError> {
    let unexpected = || ProtocolError::UnexpectedResponse(reply.to_string());

    let flags = reply.split_whitespace().last().ok_or_else(unexpected)?;
    match flags.chars().nth(source.index()) {
        Some('1') => Ok(true),
        Some('0') => Ok(false),
        _ => Err(unexpected()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(n: u8) -> SourceInput {
        SourceInput::new(n).unwrap()
    }

    #[test]
    fn power_reply_parsing() {
        assert_eq!(parse_power_reply("PWON").unwrap(), "on");
        assert_eq!(parse_power_reply("PWOFF").unwrap(), "off");
        assert!(matches!(
            parse_power_reply("PWSTA"),
            Err(ProtocolError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn status_reply_parsing() {
        assert_eq!(parse_status_reply("x2AVx1").unwrap(), input(2));
        assert_eq!(parse_status_reply("x4AVx1").unwrap(), input(4));
    }

    #[test]
    fn status_reply_rejects_garbage() {
        for reply in ["2AVx1", "xAVx1", "x9AVx1", "hello", ""] {
            assert!(
                matches!(
                    parse_status_reply(reply),
                    Err(ProtocolError::UnexpectedResponse(_))
                ),
                "reply {reply:?} should be rejected"
            );
        }
    }

    #[test]
    fn input_status_indexes_selected_source() {
        assert!(parse_input_status("InputStatus 0100", input(2)).unwrap());
        assert!(!parse_input_status("InputStatus 0100", input(1)).unwrap());
        assert!(!parse_input_status("InputStatus 0100", input(4)).unwrap());
    }

    #[test]
    fn input_status_rejects_short_flags() {
        assert!(matches!(
            parse_input_status("InputStatus 01", input(4)),
            Err(ProtocolError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn from_url_variants() {
        let client = TelnetClient::from_url("telnet://192.168.1.45:2323").unwrap();
        assert_eq!(client.host(), "192.168.1.45");
        assert_eq!(client.port(), 2323);

        let client = TelnetClient::from_url("telnet://switch.local").unwrap();
        assert_eq!(client.host(), "switch.local");
        assert_eq!(client.port(), TelnetClient::DEFAULT_PORT);

        let client = TelnetClient::from_url("192.168.1.45:23").unwrap();
        assert_eq!(client.host(), "192.168.1.45");
    }

    #[test]
    fn from_url_rejects_bad_addresses() {
        assert!(TelnetClient::from_url("telnet://").is_err());
        assert!(TelnetClient::from_url("telnet://host:notaport").is_err());
    }

    #[test]
    fn complete_lines_skips_partial_tail() {
        let lines: Vec<&str> = complete_lines("PWSTA\r\nPWON\r\nPW").collect();
        assert_eq!(lines, vec!["PWSTA", "PWON"]);

        let lines: Vec<&str> = complete_lines("PWO").collect();
        assert!(lines.is_empty());
    }
}
