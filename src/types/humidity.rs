// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target humidity level.

use std::fmt;

use crate::error::ValueError;

/// Target relative humidity in percent (35-100).
///
/// Below 35% the unit's humidity control has no effect, so the web UI does
/// not offer those values either.
///
/// # Examples
///
/// ```
/// use zephyr_lib::types::HumidityLevel;
///
/// let level = HumidityLevel::new(55).unwrap();
/// assert_eq!(level.value(), 55);
///
/// assert!(HumidityLevel::new(30).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct HumidityLevel(u8);

impl HumidityLevel {
    /// Minimum target humidity.
    pub const MIN: u8 = 35;

    /// Maximum target humidity.
    pub const MAX: u8 = 100;

    /// Creates a new target humidity level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [35, 100].
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: u16::from(Self::MIN),
                max: u16::from(Self::MAX),
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the humidity level.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for HumidityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for HumidityLevel {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_range() {
        assert_eq!(HumidityLevel::new(35).unwrap().value(), 35);
        assert_eq!(HumidityLevel::new(100).unwrap().value(), 100);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            HumidityLevel::new(34),
            Err(ValueError::OutOfRange {
                min: 35,
                max: 100,
                actual: 34
            })
        );
        assert!(HumidityLevel::try_from(101).is_err());
    }
}
