//! Common helpers shared across all models.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Placeholder shown when an album has no release date.
pub const NO_RELEASE_DATE: &str = "Release date unavailable";

/// Deserialize a count that the backend may send as a number, a numeric
/// string, or null. Anything unparseable becomes 0.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value))
}

/// Extract a count from an arbitrary JSON value.
///
/// Strings are read up to the first non-digit, so `"1234 plays"` is 1234.
pub fn count_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

/// Deserialize a string that may be null.
pub fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Format a number with comma thousands separators.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a release date for display, e.g. `"01 Jan 2001"` becomes
/// `"January 1, 2001"`.
///
/// Empty input yields [`NO_RELEASE_DATE`]; strings that are not a known
/// date format are returned unchanged.
pub fn format_release_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return NO_RELEASE_DATE.to_string();
    }
    match parse_release_date(raw) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// Parse the date layouts the backend is known to emit.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    for fmt in ["%d %b %Y", "%Y-%m-%d", "%d %B %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    for fmt in ["%d %b %Y, %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}

/// Format a duration in milliseconds as `12.34ms` or, from one second
/// up, as `1.23s`.
pub fn format_time(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{:.2}ms", ms)
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}
