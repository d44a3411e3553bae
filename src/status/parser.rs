// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for the unit's HTML status page.
//!
//! The page is not parsed as HTML. It is scanned for the one pattern it is
//! built from, `<b>Label:</b> value`, repeated any number of times with
//! arbitrary markup around it. Attributes inside the `<b>` tag are tolerated;
//! nested or broken markup is not handled.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::status::{DeviceSnapshot, Value, is_numeric_key};

/// `<b ...>Label:</b> value`, value running up to the next tag.
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<b(?:\s[^>]*)?>\s*([^:<]+?)\s*:\s*</b\s*>([^<]+)")
        .expect("status label pattern is valid")
});

/// First signed integer or decimal in a value.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("number pattern is valid"));

/// Parses a status page into a snapshot.
///
/// Never fails: a page without any recognizable label yields an empty
/// snapshot. A label with a blank value is skipped, so its key stays
/// unknown. When a label appears more than once, the last non-blank
/// occurrence wins.
///
/// # Examples
///
/// ```
/// use zephyr_lib::status::{self, Value};
///
/// let snapshot = status::parse(r#"<p><b class="k">RSSI:</b> -52 dBm</p>"#);
/// assert_eq!(snapshot.get("rssi"), Some(&Value::Integer(-52)));
///
/// assert!(status::parse("<html>maintenance</html>").is_empty());
/// ```
#[must_use]
pub fn parse(html: &str) -> DeviceSnapshot {
    let mut fields = BTreeMap::new();
    let mut degraded = BTreeSet::new();

    for caps in LABEL_RE.captures_iter(html) {
        let key = normalize_label(&caps[1]);
        if key.is_empty() {
            continue;
        }
        let text = html_escape::decode_html_entities(&caps[2]);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let (value, ok) = coerce_value(&key, text);

        if ok {
            degraded.remove(&key);
        } else {
            tracing::warn!(field = %key, value = %value, "Numeric field kept as text");
            degraded.insert(key.clone());
        }
        fields.insert(key, value);
    }

    tracing::debug!(fields = fields.len(), degraded = degraded.len(), "Parsed status page");

    DeviceSnapshot::new(fields, degraded)
}

/// Turns a display label into a snapshot key: `"Fan  Speed"` -> `"fan_speed"`.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Coerces a trimmed value for `key`.
///
/// Numeric keys take the first number found in the text; every other key
/// keeps the text as-is, even when it starts with digits. The flag is
/// `false` when a numeric key had to fall back to text.
fn coerce_value(key: &str, text: &str) -> (Value, bool) {
    if !is_numeric_key(key) {
        return (Value::Text(text.to_string()), true);
    }

    let number = NUMBER_RE.find(text).and_then(|m| {
        let digits = m.as_str();
        if digits.contains('.') {
            digits.parse::<f64>().ok().map(Value::Float)
        } else {
            digits.parse::<i64>().ok().map(Value::Integer)
        }
    });

    match number {
        Some(value) => (value, true),
        None => (Value::Text(text.to_string()), false),
    }
}
