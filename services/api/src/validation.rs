//! Input validation utilities

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

/// Check that a value has the canonical hyphenated UUID shape (versions 1-5)
pub fn is_uuid(value: &str) -> bool {
    static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = UUID_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
        )
        .expect("Failed to compile uuid regex")
    });

    regex.is_match(value)
}

/// Keep a required text field only when it is present and non-empty
pub fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse an identifier coming from a path segment, query string or body
pub fn parse_id(value: &str, what: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("Invalid {} id: {}", what, value))
}

/// Parse a client supplied timestamp
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS[.fff]]` taken as UTC, or a
/// bare date taken as midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_is_uuid() {
        assert!(is_uuid("0b0b6d1e-4c7a-4f55-9d51-6a8f5a3c2e10"));
        assert!(is_uuid("0B0B6D1E-4C7A-4F55-9D51-6A8F5A3C2E10"));
        assert!(is_uuid(&Uuid::new_v4().to_string()));
        assert!(!is_uuid("bob123"));
        assert!(!is_uuid(""));
        // version nibble out of range
        assert!(!is_uuid("0b0b6d1e-4c7a-7f55-9d51-6a8f5a3c2e10"));
        // variant nibble out of range
        assert!(!is_uuid("0b0b6d1e-4c7a-4f55-cd51-6a8f5a3c2e10"));
        assert!(!is_uuid("0b0b6d1e4c7a4f559d516a8f5a3c2e10"));
    }

    #[test]
    fn test_required() {
        assert_eq!(required(Some("Queen".into())), Some("Queen".into()));
        assert_eq!(required(Some(String::new())), None);
        assert_eq!(required(None), None);
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "event"), Ok(id));
        assert_eq!(
            parse_id("abc", "event"),
            Err("Invalid event id: abc".to_string())
        );
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 21, 20, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-06-21T20:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-06-21T22:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-06-21T20:30:00.000Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-06-21T20:30"), Some(expected));
        assert_eq!(parse_timestamp("2025-06-21 20:30:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2025-06-21"),
            Some(Utc.with_ymd_and_hms(2025, 6, 21, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("next friday"), None);
    }
}
