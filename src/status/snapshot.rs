// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Immutable view of one status page.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::status::Value;
use crate::types::{FanSpeed, OperationMode, PowerState, device_to_percentage};

/// The typed result of parsing one status page.
///
/// A snapshot is never modified after it is built. A key that is absent
/// means the page did not show that label, so every typed accessor returns
/// `Option` and `None` must be read as "unknown", never as zero or off.
///
/// Keys are kept sorted, which makes iteration and serialization order
/// independent of the order labels appeared on the page.
///
/// # Examples
///
/// ```
/// use zephyr_lib::status;
///
/// let snapshot = status::parse("<b>Power:</b> ON <b>Fan Speed:</b> 51");
///
/// assert_eq!(snapshot.fan_speed(), Some(51));
/// assert_eq!(snapshot.fan_percentage(), Some(50));
/// assert_eq!(snapshot.is_on(), Some(true));
/// assert!(snapshot.temperature().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    fields: BTreeMap<String, Value>,
    degraded: BTreeSet<String>,
    fetched_at: DateTime<Utc>,
}

/// Identity fields of the unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Device identifier.
    pub device_id: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Firmware version.
    pub version: Option<String>,
    /// IP address reported by the unit.
    pub ip: Option<String>,
    /// Wi-Fi network name.
    pub ssid: Option<String>,
}

impl DeviceSnapshot {
    pub(crate) fn new(fields: BTreeMap<String, Value>, degraded: BTreeSet<String>) -> Self {
        Self {
            fields,
            degraded,
            fetched_at: Utc::now(),
        }
    }

    /// Returns the raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns `true` if the page contained the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over all fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over all keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Keys that are expected to be numeric but were kept as text.
    pub fn degraded_fields(&self) -> impl Iterator<Item = &str> {
        self.degraded.iter().map(String::as_str)
    }

    /// Returns `true` if any numeric field could not be coerced.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    /// When the page was fetched and parsed.
    #[must_use]
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Returns the value for `key` as an integer.
    #[must_use]
    pub fn integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// Returns the value for `key` as a float.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Returns the value for `key` rendered as text, whatever its type.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(ToString::to_string)
    }

    // ========== Typed accessors ==========

    /// Power state, if the page reports a recognizable one.
    #[must_use]
    pub fn power(&self) -> Option<PowerState> {
        self.get("power")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// Whether the unit is running.
    ///
    /// Uses the power field when present and otherwise infers from the fan
    /// speed: anything above the slowest native speed counts as running.
    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        if let Some(power) = self.power() {
            return Some(power.is_on());
        }
        self.fan_speed()
            .map(|speed| speed > i64::from(FanSpeed::MIN))
    }

    /// Native fan speed (nominally 22-80). A decimal reading is truncated.
    #[must_use]
    pub fn fan_speed(&self) -> Option<i64> {
        self.get("fan_speed").and_then(Value::as_i64_truncated)
    }

    /// Fan speed as a 0-100 percentage.
    #[must_use]
    pub fn fan_percentage(&self) -> Option<u8> {
        self.fan_speed().map(device_to_percentage)
    }

    /// Temperature in °C.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.number("temperature")
    }

    /// Relative humidity in %.
    #[must_use]
    pub fn humidity(&self) -> Option<f64> {
        self.number("humidity")
    }

    /// Target humidity in %.
    #[must_use]
    pub fn target_humidity(&self) -> Option<f64> {
        self.number("set_humidity")
    }

    /// Wi-Fi signal strength in dBm.
    #[must_use]
    pub fn rssi(&self) -> Option<i64> {
        self.integer("rssi")
    }

    /// Hours on the filter timer.
    #[must_use]
    pub fn filter_timer(&self) -> Option<i64> {
        self.integer("filter_timer")
    }

    /// Current operation mode, matched case-insensitively.
    #[must_use]
    pub fn operation_mode(&self) -> Option<OperationMode> {
        self.get("operation_mode")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// Whether the buzzer is enabled (`1` on the page).
    #[must_use]
    pub fn buzzer_enabled(&self) -> Option<bool> {
        self.integer("buzzer").map(|v| v == 1)
    }

    /// Identity fields of the unit.
    #[must_use]
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            device_id: self.text("device_id"),
            model: self.text("model"),
            version: self.text("version"),
            ip: self.text("ip"),
            ssid: self.text("ssid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::parse;

    const PAGE: &str = r#"
        <div class="status">
          <b>Device ID:</b> ZX-00417<br>
          <b>Model:</b> 2023 Zephyr 160<br>
          <b>Version:</b> 1.4.2<br>
          <b>IP:</b> 192.168.1.60<br>
          <b>RSSI:</b> -52 dBm<br>
          <b>Power:</b> ON<br>
          <b>Fan Speed:</b> 51<br>
          <b>Temperature:</b> 19.71 &deg;C<br>
          <b>Humidity:</b> 48.2 %<br>
          <b>Operation Mode:</b> CYCLE<br>
          <b>Set Humidity:</b> 55 %<br>
          <b>Buzzer:</b> 1<br>
          <b>Filter Timer:</b> 1200 h<br>
        </div>"#;

    #[test]
    fn typed_accessors() {
        let snapshot = parse(PAGE);
        assert_eq!(snapshot.power(), Some(PowerState::On));
        assert_eq!(snapshot.is_on(), Some(true));
        assert_eq!(snapshot.fan_speed(), Some(51));
        assert_eq!(snapshot.fan_percentage(), Some(50));
        assert_eq!(snapshot.temperature(), Some(19.71));
        assert_eq!(snapshot.humidity(), Some(48.2));
        assert_eq!(snapshot.target_humidity(), Some(55.0));
        assert_eq!(snapshot.rssi(), Some(-52));
        assert_eq!(snapshot.filter_timer(), Some(1200));
        assert_eq!(snapshot.operation_mode(), Some(OperationMode::Cycle));
        assert_eq!(snapshot.buzzer_enabled(), Some(true));
    }

    #[test]
    fn device_info_keeps_text() {
        let info = parse(PAGE).device_info();
        assert_eq!(info.device_id.as_deref(), Some("ZX-00417"));
        assert_eq!(info.model.as_deref(), Some("2023 Zephyr 160"));
        assert_eq!(info.version.as_deref(), Some("1.4.2"));
        assert_eq!(info.ip.as_deref(), Some("192.168.1.60"));
        assert_eq!(info.ssid, None);
    }

    #[test]
    fn missing_fields_are_unknown() {
        let snapshot = parse("<b>Model:</b> Zephyr");
        assert_eq!(snapshot.power(), None);
        assert_eq!(snapshot.is_on(), None);
        assert_eq!(snapshot.fan_percentage(), None);
        assert_eq!(snapshot.buzzer_enabled(), None);
        assert_eq!(snapshot.operation_mode(), None);
    }

    #[test]
    fn decimal_fan_speed_is_truncated() {
        let snapshot = parse("<b>Fan Speed:</b> 51.5");
        assert_eq!(snapshot.fan_speed(), Some(51));
        assert_eq!(snapshot.fan_percentage(), Some(50));
        assert_eq!(snapshot.number("fan_speed"), Some(51.5));
    }

    #[test]
    fn is_on_falls_back_to_fan_speed() {
        assert_eq!(parse("<b>Fan Speed:</b> 40").is_on(), Some(true));
        assert_eq!(parse("<b>Fan Speed:</b> 22").is_on(), Some(false));
        assert_eq!(
            parse("<b>Power:</b> OFF <b>Fan Speed:</b> 40").is_on(),
            Some(false)
        );
    }

    #[test]
    fn unrecognized_mode_is_unknown() {
        let snapshot = parse("<b>Operation Mode:</b> Boost");
        assert_eq!(snapshot.operation_mode(), None);
        assert_eq!(snapshot.text("operation_mode").as_deref(), Some("Boost"));
    }

    #[test]
    fn serializes_in_key_order() {
        let a = parse("<b>Power:</b> ON <b>Fan Speed:</b> 51");
        let b = parse("<b>Fan Speed:</b> 51 <b>Power:</b> ON");
        let json_a = serde_json::to_value(&a).unwrap();
        let json_b = serde_json::to_value(&b).unwrap();
        assert_eq!(json_a["fields"], json_b["fields"]);
        assert_eq!(
            json_a["fields"].to_string(),
            r#"{"fan_speed":51,"power":"ON"}"#
        );
    }
}
