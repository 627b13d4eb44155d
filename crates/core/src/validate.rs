//! Primitive validators over untyped JSON.
//!
//! Each validator narrows a `serde_json::Value` to one Rust type. Strict
//! validators return `Err` on mismatch; lenient ones (`validate_optional_string`,
//! `lenient_enum`, `filter_by_values`) degrade to `None` / drop the element.
//! Callers pick the family per field.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{ValidationError, ValidationResult, describe};

/// A closed universe of wire strings (`"male"`, `"kg"`, `"hkid"`, ...).
pub trait WireEnum: Copy + PartialEq + core::fmt::Debug + 'static {
    /// Every member, in declaration order.
    const ALL: &'static [Self];

    /// Wire representation of this member.
    fn as_str(&self) -> &'static str;

    fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

/// Implement [`WireEnum`] for a fieldless enum from a variant → wire string table.
#[macro_export]
macro_rules! wire_enum {
    ($t:ty { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $crate::validate::WireEnum for $t {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str($crate::validate::WireEnum::as_str(self))
            }
        }
    };
}

/// JavaScript-style truthiness, which the services rely on for optional flags.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether `value` is an object carrying every key in `keys`.
///
/// Never fails: non-objects (including `null` and arrays) yield `false`. An
/// empty key list is satisfied by any object.
pub fn has_keys(value: &Value, keys: &[&str]) -> bool {
    value
        .as_object()
        .is_some_and(|obj| keys.iter().all(|k| obj.contains_key(*k)))
}

/// Structural guard: the object behind `value`, or an error naming every expected key.
pub fn expect_keys<'a>(
    value: &'a Value,
    keys: &[&'static str],
) -> ValidationResult<&'a Map<String, Value>> {
    match value.as_object() {
        Some(obj) if keys.iter().all(|k| obj.contains_key(*k)) => Ok(obj),
        _ => Err(ValidationError::MissingKeys(keys.to_vec())),
    }
}

pub fn validate_string(value: &Value) -> ValidationResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(ValidationError::NotString(describe(other))),
    }
}

pub fn validate_optional_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

pub fn validate_number(value: &Value) -> ValidationResult<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ValidationError::NotNumber(n.to_string())),
        other => Err(ValidationError::NotNumber(describe(other))),
    }
}

/// A number, or a string holding one (the profile service echoes weights as `"80.0"`).
pub fn validate_numeric(value: &Value) -> ValidationResult<f64> {
    match value {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| ValidationError::NotNumber(describe(value))),
        other => validate_number(other),
    }
}

pub fn validate_boolean(value: &Value) -> ValidationResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(ValidationError::NotBoolean(describe(other))),
    }
}

/// Strict enum: a member of `T`'s universe or an error.
pub fn strict_enum<T: WireEnum>(value: &Value) -> ValidationResult<T> {
    validate_enum(value, T::ALL)
}

/// Strict enum restricted to `accepted`.
pub fn validate_enum<T: WireEnum>(value: &Value, accepted: &[T]) -> ValidationResult<T> {
    value
        .as_str()
        .and_then(|s| accepted.iter().copied().find(|v| v.as_str() == s))
        .ok_or_else(|| ValidationError::InvalidEnum {
            value: describe(value),
            accepted: accepted.iter().map(|v| v.as_str()).collect(),
        })
}

/// Lenient enum: unknown or non-string values become `None`.
pub fn lenient_enum<T: WireEnum>(value: &Value) -> Option<T> {
    value.as_str().and_then(T::from_wire)
}

/// Apply `validator` to every element of an array; the first failure aborts.
pub fn validate_array<T, F>(value: &Value, validator: F) -> ValidationResult<Vec<T>>
where
    F: FnMut(&Value) -> ValidationResult<T>,
{
    match value {
        Value::Array(items) => items.iter().map(validator).collect(),
        other => Err(ValidationError::NotArray(describe(other))),
    }
}

/// Keep the string elements that belong to `accepted`, silently dropping the rest.
pub fn filter_by_values<T: WireEnum>(value: &Value, accepted: &[T]) -> ValidationResult<Vec<T>> {
    match value {
        Value::Array(items) => Ok(items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|s| accepted.iter().copied().find(|v| v.as_str() == s))
            .collect()),
        other => Err(ValidationError::NotArray(describe(other))),
    }
}

/// Seconds since the Unix epoch (fractions allowed).
pub fn validate_unix_timestamp(value: &Value) -> ValidationResult<DateTime<Utc>> {
    let secs = match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    secs.filter(|s| s.is_finite())
        .and_then(|s| DateTime::from_timestamp_millis((s * 1000.0).round() as i64))
        .ok_or_else(|| ValidationError::InvalidTimestamp(describe(value)))
}

/// A date-time string in one of the formats the services emit.
pub fn validate_datetime(value: &Value) -> ValidationResult<DateTime<Utc>> {
    let raw = validate_string(value)?;
    parse_datetime(&raw).ok_or(ValidationError::InvalidDateTime(raw))
}

/// Parse RFC 3339, a naive date-time (taken as UTC) or a bare date (UTC midnight).
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
