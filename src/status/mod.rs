// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status page parsing and the typed snapshot it produces.
//!
//! The unit reports its whole state as an HTML fragment of `<b>Label:</b>
//! value` pairs. [`parse`] turns that fragment into a [`DeviceSnapshot`]:
//!
//! 1. Labels become keys: trimmed, lower-cased, whitespace runs replaced by
//!    `_` (`"Fan Speed"` becomes `fan_speed`).
//! 2. Values are HTML-unescaped and trimmed.
//! 3. Values of numeric fields (see [`KNOWN_FIELDS`]) are coerced to the
//!    first number they contain; everything else stays text.
//!
//! A numeric field without a usable number is kept as text, logged, and
//! listed in [`DeviceSnapshot::degraded_fields`]. It never fails the parse.

mod fields;
mod parser;
mod snapshot;
mod value;

pub use fields::{FieldSpec, KNOWN_FIELDS, field, is_numeric_key};
pub use parser::{normalize_label, parse};
pub use snapshot::{DeviceInfo, DeviceSnapshot};
pub use value::Value;
