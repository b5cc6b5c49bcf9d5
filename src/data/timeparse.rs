use chrono::NaiveDateTime;
use thiserror::Error;

/// Timestamp formats accepted in the `time` column, tried in order:
/// ISO-8601 (with optional fractional seconds) and the MATLAB `datestr`
/// default emitted by the upstream preprocessing export.
const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%d-%b-%Y %H:%M:%S"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognized timestamp '{value}' (expected ISO-8601 or MATLAB datestr)")]
pub struct TimeParseError {
    pub value: String,
}

/// Parse one string-encoded timestamp from the `time` column.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TimeParseError> {
    let trimmed = value.trim();
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }
    Err(TimeParseError {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_iso8601() {
        let dt = parse_timestamp("2020-01-01T00:00:01").unwrap();
        assert_eq!(dt.year(), 2020);
        assert_eq!(dt.second(), 1);
    }

    #[test]
    fn parses_iso8601_with_fraction() {
        let dt = parse_timestamp("2020-01-01T00:00:01.250").unwrap();
        assert_eq!(dt.nanosecond(), 250_000_000);
    }

    #[test]
    fn parses_matlab_datestr() {
        let dt = parse_timestamp("01-Jan-2020 00:00:01").unwrap();
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.second(), 1);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert!(parse_timestamp(" 2020-01-01T00:00:00 ").is_ok());
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_timestamp("not a time").unwrap_err();
        assert_eq!(err.value, "not a time");
    }

    #[test]
    fn rejects_bare_date() {
        assert!(parse_timestamp("2020-01-01").is_err());
    }
}
