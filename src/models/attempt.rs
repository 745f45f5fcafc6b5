//! A single recorded answer to a question. Attempts are append-only.
use chrono::{DateTime, NaiveDateTime, Utc};

/// Storage format of attempt timestamps (naive UTC, microsecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Clone, Debug, PartialEq)]
pub struct Attempt {
    pub id: i64,
    pub question_id: i64,
    pub correct: bool,
    pub timestamp: DateTime<Utc>,
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.naive_utc().format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp. Accepts both the naive form written by this
/// crate and RFC 3339 strings carrying an offset.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format_is_naive_iso() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap();
        assert_eq!(format_timestamp(at), "2024-05-01T12:34:56.000000");
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap();

        assert_eq!(parse_timestamp("2024-05-01T12:34:56"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:34:56.000000"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T14:34:56+02:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
