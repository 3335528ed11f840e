//! Internal helpers for input validation and conversion.
//!
//! These utilities are **not** part of the public API except for
//! [`parse_calendar_date`], which the HTTP layer uses for query filters.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{EngineError, ResultEngine};

const DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a calendar date given either as `YYYY-MM-DD` or as an ISO-8601
/// date-time (with or without offset). The time part is dropped.
///
/// `label` names the field in the error, e.g. `"deadline"`.
pub fn parse_calendar_date(value: &str, label: &str) -> ResultEngine<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date_time.date_naive());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|date_time| date_time.date())
        .ok_or_else(|| EngineError::Validation(format!("Invalid {label} format")))
}

/// Trim `value` and reject it when nothing is left.
pub(crate) fn required_text(value: &str, message: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional value, mapping blank input to `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
