// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Table of status fields the library knows about.
//!
//! Presentation layers can walk [`KNOWN_FIELDS`] to build one control or
//! sensor per entry instead of hard-coding each field. The parser uses the
//! same table to decide which labels are coerced to numbers.

/// Description of one status page field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Normalized snapshot key.
    pub key: &'static str,
    /// Human readable name.
    pub name: &'static str,
    /// Unit of measurement, if any.
    pub unit: Option<&'static str>,
    /// Whether the value is coerced to a number.
    pub numeric: bool,
}

const fn text(key: &'static str, name: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        name,
        unit: None,
        numeric: false,
    }
}

const fn number(key: &'static str, name: &'static str, unit: Option<&'static str>) -> FieldSpec {
    FieldSpec {
        key,
        name,
        unit,
        numeric: true,
    }
}

/// Every field the unit is known to report.
pub const KNOWN_FIELDS: &[FieldSpec] = &[
    text("device_id", "Device ID"),
    text("model", "Model"),
    text("version", "Version"),
    text("ssid", "SSID"),
    text("ip", "IP Address"),
    number("rssi", "WiFi RSSI", Some("dBm")),
    text("power", "Power"),
    number("fan_speed", "Fan Speed", None),
    number("temperature", "Temperature", Some("°C")),
    number("humidity", "Humidity", Some("%")),
    text("operation_mode", "Operation Mode"),
    number("set_humidity", "Set Humidity", Some("%")),
    number("humidity_boost", "Humidity Boost", None),
    number("buzzer", "Buzzer", None),
    number("filter_timer", "Filter Timer", Some("h")),
    number("hygiene_status", "Hygiene Status", None),
];

/// Looks up a field by its snapshot key.
#[must_use]
pub fn field(key: &str) -> Option<&'static FieldSpec> {
    KNOWN_FIELDS.iter().find(|f| f.key == key)
}

/// Returns `true` if values for `key` are coerced to numbers.
#[must_use]
pub fn is_numeric_key(key: &str) -> bool {
    field(key).is_some_and(|f| f.numeric)
}
