//! Date handling helpers
//!
//! Adapter rows carry raw timestamp strings; everything here reduces them to
//! UTC dates at day granularity.

use chrono::NaiveDate;

/// Parse a date string in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}

/// Extract the UTC date from an ISO 8601 timestamp
///
/// Handles formats like:
/// - "2026-08-05T10:30:00.000Z"
/// - "2026-08-05T10:30:00Z"
/// - "2026-08-05"
pub fn extract_date(timestamp: &str) -> Option<NaiveDate> {
    if timestamp.len() >= 10 {
        return parse_date(&timestamp[0..10]);
    }
    None
}

/// Format a date as YYYY-MM-DD
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_date() {
        let date = parse_date("2026-08-05").unwrap();
        assert_eq!(date.year(), 2026);
        assert_eq!(date.month(), 8);
        assert_eq!(date.day(), 5);

        assert!(parse_date("invalid").is_none());
        assert!(parse_date("2026-13-45").is_none());
    }

    #[test]
    fn test_extract_date_from_timestamps() {
        assert_eq!(extract_date("2026-08-05T10:30:00.000Z"), parse_date("2026-08-05"));
        assert_eq!(extract_date("2026-08-05T10:30:00Z"), parse_date("2026-08-05"));
        assert_eq!(extract_date("2026-08-05T10:30:00+05:00"), parse_date("2026-08-05"));
        assert_eq!(extract_date("2026-08-05"), parse_date("2026-08-05"));
    }

    #[test]
    fn test_extract_date_rejects_garbage() {
        assert_eq!(extract_date("invalid"), None);
        assert_eq!(extract_date("2026-99-99T00:00:00Z"), None);
        assert_eq!(extract_date("2026"), None);
        assert_eq!(extract_date(""), None);
    }

    #[test]
    fn test_format_date_round_trip() {
        let date = parse_date("2026-08-05").unwrap();
        assert_eq!(format_date(date), "2026-08-05");
        assert_eq!(parse_date(&format_date(date)), Some(date));
    }
}
