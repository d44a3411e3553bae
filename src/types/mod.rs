// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Zephyr device control.
//!
//! Each type checks its range at construction time, so a value that reaches
//! the transport is always one the device accepts.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off
//! - [`FanSpeed`] - Native fan speed (22-80)
//! - [`Percentage`] - Normalized fan speed (0-100%)
//! - [`OperationMode`] - Cycle, Intake or Exhaust
//! - [`HumidityLevel`] - Target humidity (35-100%)

mod humidity;
mod mode;
mod power;
mod speed;

pub use humidity::HumidityLevel;
pub use mode::OperationMode;
pub use power::PowerState;
pub use speed::{FanSpeed, Percentage, device_to_percentage, percentage_to_device};
