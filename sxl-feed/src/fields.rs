//! Lenient accessors for loosely-typed feed records.
//!
//! Every "missing => Unknown/0" policy of the crate goes through these
//! helpers. A field that is absent, `null` or of the wrong JSON type reads
//! as `None`; callers pick the default.

use serde_json::Value;

/// Placeholder for unresolved or absent text fields.
pub const UNKNOWN: &str = "Unknown";

/// A string field, or `None` when absent or not a string.
pub fn text(record: &Value, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(String::from)
}

/// A string field, falling back to [`UNKNOWN`].
pub fn text_or_unknown(record: &Value, key: &str) -> String {
    text(record, key).unwrap_or_else(|| UNKNOWN.to_string())
}

/// A numeric field as `f64`. Numeric strings are not coerced.
pub fn number(record: &Value, key: &str) -> Option<f64> {
    record.get(key).and_then(Value::as_f64)
}

/// An integer field. Floats with no fractional part are accepted.
pub fn integer(record: &Value, key: &str) -> Option<i64> {
    let value = record.get(key)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map(|f| f as i64)
    })
}

/// A boolean field; `null` and non-booleans read as `None`.
pub fn flag(record: &Value, key: &str) -> Option<bool> {
    record.get(key).and_then(Value::as_bool)
}

/// A list of strings. Non-string entries are dropped; a non-array reads as empty.
pub fn text_list(record: &Value, key: &str) -> Vec<String> {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
