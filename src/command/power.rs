// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power control command.

use crate::command::Command;
use crate::types::PowerState;

/// Command to switch the unit on or off.
///
/// # Examples
///
/// ```
/// use zephyr_lib::command::{Command, PowerCommand};
/// use zephyr_lib::types::PowerState;
///
/// assert_eq!(PowerCommand::On.path(), "/on");
/// assert_eq!(PowerCommand::from(PowerState::Off).path(), "/off");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    /// Switch the unit on.
    On,
    /// Switch the unit off.
    Off,
}

impl From<PowerState> for PowerCommand {
    fn from(state: PowerState) -> Self {
        match state {
            PowerState::On => Self::On,
            PowerState::Off => Self::Off,
        }
    }
}

impl Command for PowerCommand {
    fn path(&self) -> &'static str {
        match self {
            Self::On => "/on",
            Self::Off => "/off",
        }
    }
}
