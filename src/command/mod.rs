// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zephyr command definitions.
//!
//! The unit has no structured API. Every control is a separate path on its
//! embedded web server, and arguments travel as form fields in a POST body.
//! This module gives each of those requests a typed representation.
//!
//! # Available Commands
//!
//! | Command Type | Request | Example |
//! |-------------|---------|---------|
//! | [`StatusQuery`] | `GET /` | Read the status page |
//! | [`PowerCommand`] | `POST /on`, `POST /off` | Switch on |
//! | [`FanSpeedCommand`] | `POST /fan` `speed=<22-80>` | Speed 51 |
//! | [`ModeCommand`] | `POST /cycle`, `/intake`, `/exhaust` | Intake |
//! | [`HumidityCommand`] | `POST /humid` `level=<35-100>` | 55% |
//! | [`BuzzerCommand`] | `POST /buzzer` `state=0\|1` | Mute |
//!
//! # Examples
//!
//! ```
//! use zephyr_lib::command::{Command, FanSpeedCommand, Method};
//! use zephyr_lib::types::FanSpeed;
//!
//! let cmd = FanSpeedCommand(FanSpeed::new(51).unwrap());
//! assert_eq!(cmd.method(), Method::Post);
//! assert_eq!(cmd.path(), "/fan");
//! assert_eq!(cmd.form(), vec![("speed", "51".to_string())]);
//! ```

mod fan;
mod power;
mod settings;
mod status;

pub use fan::{FanSpeedCommand, ModeCommand};
pub use power::PowerCommand;
pub use settings::{BuzzerCommand, HumidityCommand};
pub use status::StatusQuery;

use std::fmt;

/// HTTP method used by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read-only request.
    Get,
    /// State-changing request.
    Post,
}

impl Method {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single form field: name and already-formatted value.
pub type FormField = (&'static str, String);

/// A request that can be sent to a Zephyr unit.
pub trait Command {
    /// Returns the HTTP method. Defaults to POST, which every control uses.
    fn method(&self) -> Method {
        Method::Post
    }

    /// Returns the path relative to the device root, e.g. `"/fan"`.
    fn path(&self) -> &'static str;

    /// Returns the form fields to send. Empty when the request has no body.
    fn form(&self) -> Vec<FormField> {
        Vec::new()
    }
}
