//! Epoch-seconds codec for optional timestamp fields.
//!
//! Timestamps travel as JSON numbers holding seconds since the Unix epoch,
//! with millisecond precision in the fraction. Use with
//! `#[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]`.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// Serializes `Some(t)` as epoch seconds. `None` is expected to be skipped.
pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(t) => {
            let millis = t.timestamp_millis();
            if millis % 1000 == 0 {
                serializer.serialize_i64(millis / 1000)
            } else {
                serializer.serialize_f64(millis as f64 / 1000.0)
            }
        }
        None => serializer.serialize_none(),
    }
}

/// Deserializes epoch seconds (integer or fractional) into a UTC timestamp.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(seconds) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let millis = (seconds * 1000.0).round() as i64;
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {seconds}")))
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(default, with = "super", skip_serializing_if = "Option::is_none")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_whole_seconds_serialize_as_integer() {
        let s = Stamped {
            at: Utc.timestamp_opt(1_700_000_000, 0).single(),
        };
        assert_eq!(serde_json::to_string(&s).unwrap(), r#"{"at":1700000000}"#);
    }

    #[test]
    fn test_fractional_seconds_round_trip() {
        let s: Stamped = serde_json::from_str(r#"{"at":1700000000.25}"#).unwrap();
        assert_eq!(s.at.unwrap().timestamp_millis(), 1_700_000_000_250);
        assert_eq!(serde_json::to_string(&s).unwrap(), r#"{"at":1700000000.25}"#);
    }

    #[test]
    fn test_missing_and_null_are_unset() {
        let missing: Stamped = serde_json::from_str("{}").unwrap();
        let null: Stamped = serde_json::from_str(r#"{"at":null}"#).unwrap();
        assert_eq!(missing.at, None);
        assert_eq!(null.at, None);
        assert_eq!(serde_json::to_string(&missing).unwrap(), "{}");
    }

    #[test]
    fn test_string_is_a_type_mismatch() {
        assert!(serde_json::from_str::<Stamped>(r#"{"at":"yesterday"}"#).is_err());
    }
}
