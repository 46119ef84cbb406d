//! # Lenient Deserialization Helpers
//!
//! The backend's catalog payloads are not always clean: amounts arrive as
//! numbers, numeric strings, `null`, or occasionally garbage. These helpers
//! map anything that is not a usable value to "absent" so the pricing
//! resolver can fall through its chain instead of failing the whole fetch.
//!
//! ```text
//! 150000      ──► Some(150000.0)
//! "150000.5"  ──► Some(150000.5)
//! null        ──► None
//! "abc"       ──► None
//! true        ──► None
//! ```
//!
//! Dates get the same treatment: RFC 3339 timestamps and zone-less
//! `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps are both read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// =============================================================================
// Amounts
// =============================================================================

/// Reads a JSON value as a finite `f64`, if it is one.
pub fn amount_from_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// `deserialize_with` target for optional monetary amounts.
///
/// Pair with `#[serde(default)]` so a missing field is also `None`.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value))
}

/// `deserialize_with` target for optional whole counts (stock, ratings count).
///
/// Fractional values are truncated toward zero.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let count = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        other => amount_from_value(other).map(|f| f.trunc() as i64),
    };
    Ok(count)
}

/// `deserialize_with` target for optional nested objects.
///
/// A value that does not fit `T` becomes `None` instead of an error.
pub fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

// =============================================================================
// Dates
// =============================================================================

/// Parses a backend timestamp.
///
/// Accepts RFC 3339, zone-less date-times (read as UTC) and bare dates
/// (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `deserialize_with` target for required timestamps.
pub fn flexible_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// `deserialize_with` target for optional timestamps; unparseable is `None`.
pub fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_timestamp))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_amount")]
        price: Option<f64>,
        #[serde(default, deserialize_with = "lenient_count")]
        stock: Option<i64>,
        #[serde(default, deserialize_with = "lenient_datetime")]
        at: Option<DateTime<Utc>>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_lenient_amount_accepts_numbers_and_numeric_strings() {
        assert_eq!(probe(r#"{"price": 150000}"#).price, Some(150000.0));
        assert_eq!(probe(r#"{"price": " 99.5 "}"#).price, Some(99.5));
    }

    #[test]
    fn test_lenient_amount_maps_garbage_to_none() {
        assert_eq!(probe(r#"{"price": "abc"}"#).price, None);
        assert_eq!(probe(r#"{"price": true}"#).price, None);
        assert_eq!(probe(r#"{"price": null}"#).price, None);
        assert_eq!(probe(r#"{"price": "NaN"}"#).price, None);
        assert_eq!(probe("{}").price, None);
    }

    #[test]
    fn test_lenient_count() {
        assert_eq!(probe(r#"{"stock": 7}"#).stock, Some(7));
        assert_eq!(probe(r#"{"stock": "3"}"#).stock, Some(3));
        assert_eq!(probe(r#"{"stock": 2.9}"#).stock, Some(2));
        assert_eq!(probe(r#"{"stock": []}"#).stock, None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let zoned = parse_timestamp("2024-05-01T10:00:00+07:00").unwrap();
        assert_eq!(zoned.hour(), 3);

        let naive = parse_timestamp("2024-05-01T10:00:00").unwrap();
        assert_eq!(naive.hour(), 10);

        let fractional = parse_timestamp("2024-05-01T10:00:00.123").unwrap();
        assert_eq!(fractional.day(), 1);

        let date_only = parse_timestamp("2024-05-01").unwrap();
        assert_eq!(date_only.hour(), 0);

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_lenient_datetime_field() {
        assert!(probe(r#"{"at": "2024-05-01T10:00:00Z"}"#).at.is_some());
        assert!(probe(r#"{"at": 12}"#).at.is_none());
    }
}
