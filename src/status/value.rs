// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coerced status values.

use std::fmt;

use serde::Serialize;

/// A single value scraped from the status page.
///
/// Serializes untagged, so a snapshot exported as JSON reads like the
/// page it came from: `{"fan_speed": 51, "power": "ON"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A whole number, e.g. `-52` from `"-52 dBm"`.
    Integer(i64),
    /// A decimal number, e.g. `19.71` from `"19.71 °C"`.
    Float(f64),
    /// Text kept as shown on the page (trimmed and unescaped).
    Text(String),
}

impl Value {
    /// Returns the value as an integer.
    ///
    /// Floats convert only when they have no fractional part.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            Self::Float(_) | Self::Text(_) => None,
        }
    }

    /// Returns the value as an integer, dropping any fractional part.
    ///
    /// `51.7` becomes `51`, the way the unit's own web UI reads speeds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64_truncated(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            Self::Float(_) | Self::Text(_) => None,
        }
    }

    /// Returns the value as a float. Integers are widened.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Returns the text if this is a [`Value::Text`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Integer(_) | Self::Float(_) => None,
        }
    }

    /// Returns `true` for integer and float values.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_conversions() {
        assert_eq!(Value::Integer(51).as_i64(), Some(51));
        assert_eq!(Value::Integer(51).as_f64(), Some(51.0));
        assert_eq!(Value::Float(40.0).as_i64(), Some(40));
        assert_eq!(Value::Float(19.71).as_i64(), None);
        assert_eq!(Value::from("ON").as_i64(), None);
        assert_eq!(Value::from("ON").as_f64(), None);
    }

    #[test]
    fn truncating_conversion() {
        assert_eq!(Value::Integer(51).as_i64_truncated(), Some(51));
        assert_eq!(Value::Float(51.5).as_i64_truncated(), Some(51));
        assert_eq!(Value::Float(-3.9).as_i64_truncated(), Some(-3));
        assert_eq!(Value::Float(f64::NAN).as_i64_truncated(), None);
        assert_eq!(Value::from("fast").as_i64_truncated(), None);
    }

    #[test]
    fn text_access() {
        assert_eq!(Value::from("Cycle").as_str(), Some("Cycle"));
        assert_eq!(Value::Integer(1).as_str(), None);
        assert!(Value::Float(1.5).is_numeric());
        assert!(!Value::from("1.5").is_numeric());
    }

    #[test]
    fn serializes_untagged() {
        let values = vec![Value::Integer(-52), Value::Float(19.71), Value::from("ON")];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"[-52,19.71,"ON"]"#
        );
    }

    #[test]
    fn display() {
        assert_eq!(Value::Integer(-52).to_string(), "-52");
        assert_eq!(Value::Float(19.71).to_string(), "19.71");
        assert_eq!(Value::from("OFF").to_string(), "OFF");
    }
}
