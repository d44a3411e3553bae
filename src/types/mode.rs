// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ventilation operation modes.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Airflow mode of the unit.
///
/// The set of modes is closed: anything other than these three names is
/// rejected with [`ValueError::UnknownMode`] before a request is built.
///
/// # Examples
///
/// ```
/// use zephyr_lib::types::OperationMode;
///
/// let mode: OperationMode = "Intake".parse().unwrap();
/// assert_eq!(mode, OperationMode::Intake);
/// assert_eq!(mode.as_str(), "Intake");
///
/// assert!("Turbo".parse::<OperationMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OperationMode {
    /// Heat-recovery cycle: alternates intake and exhaust.
    Cycle,
    /// Fresh air is pulled in.
    Intake,
    /// Stale air is pushed out.
    Exhaust,
}

impl OperationMode {
    /// All modes, in the order the device's web UI lists them.
    pub const ALL: [Self; 3] = [Self::Cycle, Self::Intake, Self::Exhaust];

    /// Returns the display name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cycle => "Cycle",
            Self::Intake => "Intake",
            Self::Exhaust => "Exhaust",
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperationMode {
    type Err = ValueError;

    // The status page reports modes in varying case, so matching ignores it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValueError::UnknownMode(s.to_string()))
    }
}
