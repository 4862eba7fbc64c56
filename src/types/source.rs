// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HDMI input source type.

use std::fmt;

use crate::error::ValueError;

/// An HDMI input on the switch, numbered 1 through 4.
///
/// # Examples
///
/// ```
/// use juno_lib::types::SourceInput;
///
/// let input = SourceInput::new(2).unwrap();
/// assert_eq!(input.value(), 2);
///
/// // Out-of-range inputs are rejected
/// assert!(SourceInput::new(5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SourceInput(u8);

impl SourceInput {
    /// Lowest valid input number.
    pub const MIN: u8 = 1;
    /// Highest valid input number; the Juno 451 has four HDMI inputs.
    pub const MAX: u8 = 4;

    /// All selectable inputs, in order. This is the source list exposed
    /// to the host platform.
    pub const ALL: [Self; 4] = [Self(1), Self(2), Self(3), Self(4)];

    /// Creates a new source input.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the input number is not in 1..=4.
    pub fn new(input: u8) -> Result<Self, ValueError> {
        if input < Self::MIN || input > Self::MAX {
            return Err(ValueError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: input,
            });
        }
        Ok(Self(input))
    }

    /// Returns the input number.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns the zero-based index of this input, for indexing flag strings.
    #[must_use]
    pub const fn index(&self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for SourceInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for SourceInput {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
