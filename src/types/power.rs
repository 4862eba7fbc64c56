// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state type and the raw-reading mapping.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Represents the mapped power state of the switch.
///
/// # Examples
///
/// ```
/// use juno_lib::types::PowerState;
///
/// assert_eq!(PowerState::from_raw("off"), PowerState::Off);
/// assert_eq!(PowerState::from_raw("on"), PowerState::On);
/// assert_eq!(PowerState::On.as_str(), "on");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    /// Power is off.
    #[default]
    Off,
    /// Power is on.
    On,
}

impl PowerState {
    /// Maps a raw power reading from the device.
    ///
    /// Exactly the literal `"off"` maps to [`Off`](Self::Off); every other
    /// string maps to [`On`](Self::On). This permissive mapping matches the
    /// device's reporting, where only the off state has a stable spelling.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        if raw == "off" { Self::Off } else { Self::On }
    }

    /// Returns the wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Returns `true` if the state is [`On`](Self::On).
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "on" => Ok(Self::On),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_maps_off_literal() {
        assert_eq!(PowerState::from_raw("off"), PowerState::Off);
    }

    #[test]
    fn from_raw_maps_everything_else_to_on() {
        // The mapping is permissive: anything but "off" counts as on.
        for raw in ["on", "ON", "Off", "standby", "", "0"] {
            assert_eq!(PowerState::from_raw(raw), PowerState::On, "raw = {raw:?}");
        }
    }

    #[test]
    fn as_str_round_trips() {
        assert_eq!(PowerState::On.as_str(), "on");
        assert_eq!(PowerState::Off.as_str(), "off");
        assert_eq!("on".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!("off".parse::<PowerState>().unwrap(), PowerState::Off);
    }

    #[test]
    fn from_str_rejects_unknown() {
        let result = "standby".parse::<PowerState>();
        assert!(matches!(result, Err(ValueError::InvalidPowerState(_))));
    }

    #[test]
    fn default_is_off() {
        assert_eq!(PowerState::default(), PowerState::Off);
    }
}
