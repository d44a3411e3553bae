// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed types and the percentage mapping.
//!
//! The unit runs its fan on a native scale of 22 to 80. Callers usually think
//! in percent, so this module provides the validated [`FanSpeed`] and
//! [`Percentage`] types plus the two conversion functions between them.
//!
//! The conversions round, so they are not exact inverses: a percentage that
//! goes through [`percentage_to_device`] and back through
//! [`device_to_percentage`] may come out one point off.

use std::fmt;

use crate::error::ValueError;

/// Fan speed on the device's native scale (22-80).
///
/// # Examples
///
/// ```
/// use zephyr_lib::types::FanSpeed;
///
/// let speed = FanSpeed::new(51).unwrap();
/// assert_eq!(speed.value(), 51);
/// assert_eq!(speed.to_percentage(), 50);
///
/// assert!(FanSpeed::new(21).is_err());
/// assert!(FanSpeed::new(81).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FanSpeed(u8);

impl FanSpeed {
    /// Lowest native speed the device accepts.
    pub const MIN: u8 = 22;

    /// Highest native speed the device accepts.
    pub const MAX: u8 = 80;

    /// Slowest speed.
    pub const SLOWEST: Self = Self(Self::MIN);

    /// Fastest speed.
    pub const FASTEST: Self = Self(Self::MAX);

    /// Creates a new fan speed value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [22, 80].
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

    /// Creates a fan speed, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value < Self::MIN {
            Self(Self::MIN)
        } else if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// Returns the native speed value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Converts this speed to a percentage.
    #[must_use]
    pub fn to_percentage(&self) -> u8 {
        device_to_percentage(i64::from(self.0))
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for FanSpeed {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for FanSpeed {
    fn from(value: Percentage) -> Self {
        percentage_to_device(value)
    }
}

/// A percentage in the normalized 0-100 domain.
///
/// # Examples
///
/// ```
/// use zephyr_lib::types::Percentage;
///
/// let half = Percentage::new(50).unwrap();
/// assert_eq!(half.value(), 50);
/// assert!(Percentage::new(101).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Percentage(u8);

impl Percentage {
    /// 0%.
    pub const MIN: Self = Self(0);

    /// 100%.
    pub const MAX: Self = Self(100);

    /// Creates a new percentage.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Percentage {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maps a percentage onto the native fan-speed scale.
///
/// Computes `round(22 + 58 * p / 100)`, rounding halves to even. The only
/// halves are at 25% (36.5 -> 36) and 75% (65.5 -> 66).
///
/// # Examples
///
/// ```
/// use zephyr_lib::types::{percentage_to_device, Percentage};
///
/// assert_eq!(percentage_to_device(Percentage::MIN).value(), 22);
/// assert_eq!(percentage_to_device(Percentage::new(25).unwrap()).value(), 36);
/// assert_eq!(percentage_to_device(Percentage::new(50).unwrap()).value(), 51);
/// assert_eq!(percentage_to_device(Percentage::MAX).value(), 80);
/// ```
#[must_use]
pub fn percentage_to_device(percentage: Percentage) -> FanSpeed {
    let span = u16::from(FanSpeed::MAX - FanSpeed::MIN);
    let scaled = u16::from(FanSpeed::MIN) * 100 + span * u16::from(percentage.value());
    let (whole, rest) = (scaled / 100, scaled % 100);
    let rounded = if rest > 50 || (rest == 50 && whole % 2 == 1) {
        whole + 1
    } else {
        whole
    };
    // 0 <= p <= 100 keeps the result within [MIN, MAX]
    FanSpeed::clamped(u8::try_from(rounded).unwrap_or(FanSpeed::MAX))
}

/// Maps a native fan speed onto the 0-100 percentage domain.
///
/// Speeds at or below 22 map to 0, speeds at or above 80 map to 100, and
/// everything in between is interpolated linearly and rounded. Accepts any
/// integer because the value usually comes straight from a parsed status page.
///
/// # Examples
///
/// ```
/// use zephyr_lib::types::device_to_percentage;
///
/// assert_eq!(device_to_percentage(22), 0);
/// assert_eq!(device_to_percentage(51), 50);
/// assert_eq!(device_to_percentage(80), 100);
/// assert_eq!(device_to_percentage(-3), 0);
/// ```
#[must_use]
pub fn device_to_percentage(speed: i64) -> u8 {
    let min = i64::from(FanSpeed::MIN);
    let max = i64::from(FanSpeed::MAX);
    if speed <= min {
        return 0;
    }
    if speed >= max {
        return 100;
    }
    let span = max - min;
    let percent = ((speed - min) * 100 + span / 2) / span;
    u8::try_from(percent).unwrap_or(100)
}
