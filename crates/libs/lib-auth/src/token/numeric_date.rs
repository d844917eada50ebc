//! JWT NumericDate with microsecond precision.
//!
//! Serialized as integer seconds when the value falls on a whole second and as
//! fractional seconds otherwise (RFC 7519 allows non-integer values), so
//! sub-second TTLs survive the round trip through the token.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const MICROS_PER_SEC: i64 = 1_000_000;

/// A point in time as carried in the `iat` / `exp` claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericDate(i64);

impl NumericDate {
    pub fn from_datetime(time: DateTime<Utc>) -> Self {
        Self(time.timestamp_micros())
    }

    pub fn from_timestamp_micros(micros: i64) -> Self {
        Self(micros)
    }

    pub fn timestamp_micros(self) -> i64 {
        self.0
    }

    /// Whole seconds since the epoch, rounded down.
    pub fn timestamp(self) -> i64 {
        self.0.div_euclid(MICROS_PER_SEC)
    }
}

impl Serialize for NumericDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MICROS_PER_SEC == 0 {
            serializer.serialize_i64(self.0 / MICROS_PER_SEC)
        } else {
            serializer.serialize_f64(self.0 as f64 / MICROS_PER_SEC as f64)
        }
    }
}

impl<'de> Deserialize<'de> for NumericDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        let micros = (secs * MICROS_PER_SEC as f64).round();

        if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
            return Err(de::Error::custom("NumericDate is out of range"));
        }
        Ok(Self(micros as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_seconds_serialize_as_integer() {
        let date = NumericDate::from_timestamp_micros(1_700_000_000 * MICROS_PER_SEC);
        assert_eq!(serde_json::to_string(&date).unwrap(), "1700000000");
        assert_eq!(serde_json::from_str::<NumericDate>("1700000000").unwrap(), date);
    }

    #[test]
    fn test_fractional_seconds_keep_microseconds() {
        let date = NumericDate::from_timestamp_micros(1_700_000_000_123_457);
        let json = serde_json::to_string(&date).unwrap();

        assert!(json.starts_with("1700000000.1234"), "{json}");
        assert_eq!(serde_json::from_str::<NumericDate>(&json).unwrap(), date);
    }

    #[test]
    fn test_timestamp_rounds_down() {
        assert_eq!(NumericDate::from_timestamp_micros(1_500_000).timestamp(), 1);
        assert_eq!(NumericDate::from_timestamp_micros(-1).timestamp(), -1);
    }

    #[test]
    fn test_rejects_non_numbers_and_overflow() {
        assert!(serde_json::from_str::<NumericDate>("\"soon\"").is_err());
        assert!(serde_json::from_str::<NumericDate>("1e300").is_err());
    }
}
