// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Settings commands: target humidity and buzzer.

use crate::command::{Command, FormField};
use crate::types::HumidityLevel;

/// Command to set the target humidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumidityCommand(pub HumidityLevel);

impl Command for HumidityCommand {
    fn path(&self) -> &'static str {
        "/humid"
    }

    fn form(&self) -> Vec<FormField> {
        vec![("level", self.0.value().to_string())]
    }
}

/// Command to enable or disable the key-press buzzer.
///
/// # Examples
///
/// ```
/// use zephyr_lib::command::{BuzzerCommand, Command};
///
/// assert_eq!(BuzzerCommand::from(false).form(), vec![("state", "0".to_string())]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerCommand {
    /// Turn the buzzer on.
    Enable,
    /// Turn the buzzer off.
    Disable,
}

impl From<bool> for BuzzerCommand {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enable } else { Self::Disable }
    }
}

impl Command for BuzzerCommand {
    fn path(&self) -> &'static str {
        "/buzzer"
    }

    fn form(&self) -> Vec<FormField> {
        let state = match self {
            Self::Enable => "1",
            Self::Disable => "0",
        };
        vec![("state", state.to_string())]
    }
}
