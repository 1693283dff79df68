//! Lenient timestamp parsing for import records.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a `created_at` string into epoch milliseconds.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and bare `YYYY-MM-DD`. Returns
/// `None` on anything else; callers fall back to the current time per
/// record rather than aborting the parse.
pub(crate) fn parse_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339() {
        assert_eq!(
            parse_millis("2024-01-01T00:00:00Z"),
            Some(1_704_067_200_000)
        );
    }

    #[test]
    fn parses_bare_date_as_midnight_utc() {
        assert_eq!(parse_millis("2024-01-01"), Some(1_704_067_200_000));
    }

    #[test]
    fn parses_space_separated_datetime() {
        assert_eq!(
            parse_millis("2024-01-01 12:00:00"),
            Some(1_704_110_400_000)
        );
    }

    #[test]
    fn garbage_and_blank_yield_none() {
        assert_eq!(parse_millis("yesterday"), None);
        assert_eq!(parse_millis(""), None);
        assert_eq!(parse_millis("   "), None);
    }
}
