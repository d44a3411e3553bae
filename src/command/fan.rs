// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Airflow commands: fan speed and operation mode.

use crate::command::{Command, FormField};
use crate::types::{FanSpeed, OperationMode};

/// Command to set the native fan speed.
///
/// The speed is always in the device range because [`FanSpeed`] can only be
/// constructed from a valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanSpeedCommand(pub FanSpeed);

impl Command for FanSpeedCommand {
    fn path(&self) -> &'static str {
        "/fan"
    }

    fn form(&self) -> Vec<FormField> {
        vec![("speed", self.0.value().to_string())]
    }
}

/// Command to select an operation mode.
///
/// Each mode has its own path; none of them carries a body.
///
/// # Examples
///
/// ```
/// use zephyr_lib::command::{Command, ModeCommand};
/// use zephyr_lib::types::OperationMode;
///
/// assert_eq!(ModeCommand(OperationMode::Exhaust).path(), "/exhaust");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeCommand(pub OperationMode);

impl Command for ModeCommand {
    fn path(&self) -> &'static str {
        match self.0 {
            OperationMode::Cycle => "/cycle",
            OperationMode::Intake => "/intake",
            OperationMode::Exhaust => "/exhaust",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_speed_form_uses_native_value() {
        let cmd = FanSpeedCommand(FanSpeed::new(22).unwrap());
        assert_eq!(cmd.form(), vec![("speed", "22".to_string())]);
    }

    #[test]
    fn each_mode_has_its_own_path() {
        assert_eq!(ModeCommand(OperationMode::Cycle).path(), "/cycle");
        assert_eq!(ModeCommand(OperationMode::Intake).path(), "/intake");
        assert_eq!(ModeCommand(OperationMode::Exhaust).path(), "/exhaust");
        assert!(ModeCommand(OperationMode::Intake).form().is_empty());
    }
}
