// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status page query.

use crate::command::{Command, Method};

/// Fetches the HTML status page from the device root.
///
/// The response is the raw page; see [`crate::status::parse`] for turning it
/// into a [`DeviceSnapshot`](crate::status::DeviceSnapshot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusQuery;

impl Command for StatusQuery {
    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> &'static str {
        "/"
    }
}
