//! Common types used throughout the Moloni client
//!
//! This module contains shared type definitions, type aliases,
//! and the serde helpers used by the request/response models.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Moloni entity identifier
pub type Id = u64;

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Flags
// ============================================================================

/// Booleans travel as integers `0`/`1` on the Moloni API.
///
/// Use with `#[serde(with = "crate::types::flag")]`. Deserialization also
/// accepts JSON booleans and the strings `"0"`/`"1"`/`"true"`/`"false"`.
pub mod flag {
    use super::JsonValue;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        from_value(&value).ok_or_else(|| D::Error::custom(format!("invalid flag value: {value}")))
    }

    pub(crate) fn from_value(value: &JsonValue) -> Option<bool> {
        match value {
            JsonValue::Bool(b) => Some(*b),
            JsonValue::Number(n) => n.as_i64().map(|n| n != 0),
            JsonValue::String(s) => match s.trim() {
                "1" | "true" => Some(true),
                "0" | "false" | "" => Some(false),
                _ => None,
            },
            JsonValue::Null => Some(false),
            _ => None,
        }
    }

    /// `Option<bool>` flavor: `None` is skipped by the caller, `null` reads as `None`
    pub mod option {
        use super::super::JsonValue;
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            value: &Option<bool>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(b) => serializer.serialize_u8(u8::from(*b)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<bool>, D::Error> {
            let value = JsonValue::deserialize(deserializer)?;
            if value.is_null() {
                return Ok(None);
            }
            super::from_value(&value)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid flag value: {value}")))
        }
    }
}

// ============================================================================
// Lenient deserializers
// ============================================================================

/// Deserializers tolerant of numbers sent as strings and vice versa.
pub mod de {
    use super::JsonValue;
    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    /// Any scalar as a string; `null` becomes empty
    pub fn string_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        match value {
            JsonValue::String(s) => Ok(s),
            JsonValue::Number(n) => Ok(n.to_string()),
            JsonValue::Bool(b) => Ok(b.to_string()),
            JsonValue::Null => Ok(String::new()),
            other => Err(D::Error::custom(format!("expected a scalar, got {other}"))),
        }
    }

    /// Optional string; scalars other than strings are stringified
    pub fn option_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        match value {
            JsonValue::Null => Ok(None),
            JsonValue::String(s) => Ok(Some(s)),
            JsonValue::Number(n) => Ok(Some(n.to_string())),
            JsonValue::Bool(b) => Ok(Some(b.to_string())),
            other => Err(D::Error::custom(format!("expected a scalar, got {other}"))),
        }
    }

    /// Identifier from a number or a numeric string
    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        as_u64(&value).ok_or_else(|| D::Error::custom(format!("invalid identifier: {value}")))
    }

    /// Optional identifier; `null`, `""` and `0` are all read as `None`
    pub fn option_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        match value {
            JsonValue::Null => Ok(None),
            JsonValue::String(ref s) if s.trim().is_empty() => Ok(None),
            _ => as_u64(&value)
                .map(|id| (id != 0).then_some(id))
                .ok_or_else(|| D::Error::custom(format!("invalid identifier: {value}"))),
        }
    }

    /// Optional float from a number or a numeric string
    pub fn option_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        match value {
            JsonValue::Null => Ok(None),
            JsonValue::Number(n) => Ok(n.as_f64()),
            JsonValue::String(s) if s.trim().is_empty() => Ok(None),
            JsonValue::String(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid number: {s}"))),
            other => Err(D::Error::custom(format!("expected a number, got {other}"))),
        }
    }

    /// Optional integer from a number or a numeric string; integral floats
    /// (`1.0`) are accepted, fractional ones are an error
    pub fn option_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        match value {
            JsonValue::Null => Ok(None),
            JsonValue::String(ref s) if s.trim().is_empty() => Ok(None),
            JsonValue::Number(_) | JsonValue::String(_) => as_i64(&value)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid integer: {value}"))),
            other => Err(D::Error::custom(format!("expected an integer, got {other}"))),
        }
    }

    /// Optional date; accepts `YYYY-MM-DD` with or without a time suffix
    /// (`2024-03-01T00:00:00+0000`)
    pub fn option_date<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        match value {
            JsonValue::Null => Ok(None),
            JsonValue::String(s) if s.trim().is_empty() || s.starts_with("0000") => Ok(None),
            JsonValue::String(s) => {
                let day = s.get(..10).unwrap_or(s.as_str());
                NaiveDate::parse_from_str(day, "%Y-%m-%d")
                    .map(Some)
                    .map_err(|_| D::Error::custom(format!("invalid date: {s}")))
            }
            other => Err(D::Error::custom(format!("expected a date, got {other}"))),
        }
    }

    /// Float from a number or a numeric string; `null` and `""` read as `0`
    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        option_f64(deserializer).map(Option::unwrap_or_default)
    }

    /// Read a JSON number or numeric string as `u64`; `3.0` counts, `3.5` does not
    pub(crate) fn as_u64(value: &JsonValue) -> Option<u64> {
        as_i64(value).and_then(|n| u64::try_from(n).ok())
    }

    fn as_i64(value: &JsonValue) -> Option<i64> {
        match value {
            JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
            JsonValue::String(s) => {
                let s = s.trim();
                s.parse()
                    .ok()
                    .or_else(|| s.parse().ok().and_then(integral))
            }
            _ => None,
        }
    }

    fn integral(f: f64) -> Option<i64> {
        let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
        (in_range && f.fract() == 0.0).then(|| f as i64)
    }
}

// ============================================================================
// Timestamps
// ============================================================================

/// Timestamps travel as `YYYY-MM-DD HH:MM:SS` (e.g. `lastmodified`).
///
/// Use with `#[serde(with = "crate::types::datetime")]`.
pub mod datetime {
    use chrono::NaiveDateTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S%z"))
            .map_err(|_| D::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
