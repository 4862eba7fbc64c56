// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Feature flags exposed to the host platform.

use std::fmt;
use std::ops::BitOr;

/// Bitmask of media-player features the device supports.
///
/// The bit values match the host platform's media-player feature constants,
/// so the mask can be handed to the platform unchanged.
///
/// # Examples
///
/// ```
/// use juno_lib::types::SupportedFeatures;
///
/// let features = SupportedFeatures::TURN_ON
///     | SupportedFeatures::TURN_OFF
///     | SupportedFeatures::SELECT_SOURCE;
///
/// assert!(features.contains(SupportedFeatures::SELECT_SOURCE));
/// assert_eq!(features.bits(), 128 | 256 | 2048);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SupportedFeatures(u32);

impl SupportedFeatures {
    /// The device can be turned on.
    pub const TURN_ON: Self = Self(128);
    /// The device can be turned off.
    pub const TURN_OFF: Self = Self(256);
    /// The input source can be selected.
    pub const SELECT_SOURCE: Self = Self(2048);

    /// An empty feature set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Everything the Juno switch supports: turn on, turn off, select source.
    #[must_use]
    pub const fn switch() -> Self {
        Self(Self::TURN_ON.0 | Self::TURN_OFF.0 | Self::SELECT_SOURCE.0)
    }

    /// Returns `true` if all bits of `other` are set in `self`.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the raw bitmask value.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.0
    }
}

impl BitOr for SupportedFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for SupportedFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_supports_all_three_features() {
        let features = SupportedFeatures::switch();

        assert!(features.contains(SupportedFeatures::TURN_ON));
        assert!(features.contains(SupportedFeatures::TURN_OFF));
        assert!(features.contains(SupportedFeatures::SELECT_SOURCE));
    }

    #[test]
    fn platform_bit_values() {
        assert_eq!(SupportedFeatures::TURN_ON.bits(), 128);
        assert_eq!(SupportedFeatures::TURN_OFF.bits(), 256);
        assert_eq!(SupportedFeatures::SELECT_SOURCE.bits(), 2048);
    }

    #[test]
    fn bitor_combines_flags() {
        let features = SupportedFeatures::TURN_ON | SupportedFeatures::TURN_OFF;

        assert!(features.contains(SupportedFeatures::TURN_ON));
        assert!(!features.contains(SupportedFeatures::SELECT_SOURCE));
    }

    #[test]
    fn empty_contains_nothing() {
        let empty = SupportedFeatures::empty();
        assert!(!empty.contains(SupportedFeatures::TURN_ON));
        assert_eq!(empty.bits(), 0);
    }
}
