use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Result, ScorecardError};

/// Timestamp layout used by scorecard exports, e.g. `2024-05-01 1430`.
pub const SCORECARD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H%M";

/// Layout accepted for command-line date bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `StartDate`/`EndDate` cell.
///
/// Returns `None` for anything that does not match
/// [`SCORECARD_TIMESTAMP_FORMAT`]; the caller attaches file and row context.
pub fn parse_scorecard_timestamp(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, SCORECARD_TIMESTAMP_FORMAT).ok()
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| ScorecardError::InvalidDate(s.to_string()))
}

/// `clap` value parser wrapper around [`parse_date`].
pub fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_scorecard_timestamp() {
        let ts = parse_scorecard_timestamp("2024-05-01 1430").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 5, 1));
        assert_eq!((ts.hour(), ts.minute()), (14, 30));
    }

    #[test]
    fn test_parse_scorecard_timestamp_rejects_other_layouts() {
        assert!(parse_scorecard_timestamp("").is_none());
        assert!(parse_scorecard_timestamp("2024-05-01T14:30:00Z").is_none());
        assert!(parse_scorecard_timestamp("2024-05-01 14:30").is_none());
        assert!(parse_scorecard_timestamp("2024-13-01 1430").is_none());
    }

    #[test]
    fn test_parse_date_accepts_valid_dates() {
        for s in ["2024-01-15", "1999-12-31", "2020-02-29"] {
            assert!(parse_date(s).is_ok(), "{} should parse", s);
        }
    }

    #[test]
    fn test_parse_date_rejects_invalid_dates() {
        for s in ["", "2024-13-01", "2024-01-32", "2023-02-29", "foo"] {
            let err = parse_date(s).unwrap_err();
            assert!(matches!(err, ScorecardError::InvalidDate(_)), "{}", s);
        }
    }

    #[test]
    fn test_parse_date_arg_message() {
        let msg = parse_date_arg("not-a-date").unwrap_err();
        assert_eq!(msg, "Invalid date: 'not-a-date'. Format must be YYYY-MM-DD");
    }
}
