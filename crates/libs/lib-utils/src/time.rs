//! # Time Utilities
//!
//! Utilities for time formatting and manipulation using chrono.

use chrono::{DateTime, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format time as RFC3339 string.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// Convert a Unix timestamp (seconds) to a UTC DateTime.
pub fn from_unix(secs: i64) -> Result<DateTime<Utc>, Error> {
    DateTime::from_timestamp(secs, 0).ok_or(Error::TimestampOutOfRange(secs))
}

// region:    --- Error
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    TimestampOutOfRange(i64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_unix_and_format() {
        let time = from_unix(0).expect("epoch should be representable");
        assert_eq!(format_time(time), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_from_unix_out_of_range() {
        assert_eq!(from_unix(i64::MAX), Err(Error::TimestampOutOfRange(i64::MAX)));
    }
}
