//! Date parsing for task payloads and calendar routes.

use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::ApiError;

pub const MSG_INVALID_DATE: &str = "Formato de data inválido";
pub const MSG_INVALID_CALENDAR_DATE: &str = "Formato de data inválido (use YYYY-MM-DD)";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Years accepted from clients. chrono parses signed years of any width,
/// PostgreSQL timestamps cannot hold most of them.
const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9999;

fn in_supported_range(date: NaiveDate) -> bool {
    SUPPORTED_YEARS.contains(&date.year())
}

/// Parse an ISO-8601 due date.
///
/// Offsets are converted to UTC, naive date-times are taken as UTC and a bare
/// date means midnight UTC.
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>, ApiError> {
    parse_any_due_date(value.trim())
        .filter(|dt| in_supported_range(dt.date_naive()))
        .ok_or_else(|| ApiError::BadRequest(MSG_INVALID_DATE.to_string()))
}

fn parse_any_due_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Parse an optional due date, treating blank strings as absent.
pub fn parse_optional_due_date(value: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_due_date(v).map(Some),
    }
}

/// Parse a `YYYY-MM-DD` calendar day.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .filter(|date| in_supported_range(*date))
        .ok_or_else(|| ApiError::BadRequest(MSG_INVALID_CALENDAR_DATE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_zulu_and_offset() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_due_date("2026-03-01T12:30:00Z").unwrap(), expected);
        assert_eq!(parse_due_date("2026-03-01T09:30:00-03:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_naive_is_utc() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_due_date("2026-03-01T12:30:00").unwrap(), expected);
        assert_eq!(parse_due_date("2026-03-01 12:30:00").unwrap(), expected);
        assert_eq!(parse_due_date("2026-03-01T12:30").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        assert_eq!(
            parse_due_date("2026-03-01").unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_invalid_due_date() {
        match parse_due_date("amanhã") {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, MSG_INVALID_DATE),
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse_due_date("2026-13-01").is_err());
    }

    #[test]
    fn test_optional_due_date() {
        assert_eq!(parse_optional_due_date(None).unwrap(), None);
        assert_eq!(parse_optional_due_date(Some("  ")).unwrap(), None);
        assert!(parse_optional_due_date(Some("2026-03-01")).unwrap().is_some());
    }

    #[test]
    fn test_calendar_date() {
        assert_eq!(
            parse_calendar_date("2026-02-28").unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        match parse_calendar_date("28/02/2026") {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, MSG_INVALID_CALENDAR_DATE),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_due_date_outside_storable_years() {
        for value in [
            "+200000-01-01",
            "-5000-01-01",
            "0000-06-01",
            "+10000-01-01T00:00:00Z",
            "+262142-12-31T10:00",
        ] {
            match parse_due_date(value) {
                Err(ApiError::BadRequest(msg)) => assert_eq!(msg, MSG_INVALID_DATE, "{}", value),
                other => panic!("{} parsed as {:?}", value, other),
            }
        }
        assert!(parse_due_date("0001-01-01").is_ok());
        assert!(parse_due_date("9999-12-31T23:59:59Z").is_ok());
    }

    #[test]
    fn test_calendar_date_outside_storable_years() {
        for value in ["+262142-12-31", "+200000-01-01", "-5000-01-01"] {
            match parse_calendar_date(value) {
                Err(ApiError::BadRequest(msg)) => {
                    assert_eq!(msg, MSG_INVALID_CALENDAR_DATE, "{}", value)
                }
                other => panic!("{} parsed as {:?}", value, other),
            }
        }
        assert_eq!(
            parse_calendar_date("9999-12-31").unwrap(),
            NaiveDate::from_ymd_opt(9999, 12, 31).unwrap()
        );
    }
}
