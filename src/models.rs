//! Value types passed between callers and the session store

use crate::error::{CoreError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Storage format for timestamps. SQLite's `DATETIME()` parses it directly.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats accepted when reading timestamps back or from user input
const ACCEPTED_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// One recorded coding interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Row id, 0 until the session has been inserted
    pub id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Hours between start and end, two decimals
    pub duration: String,
}

impl Session {
    /// Build an unsaved session, computing its duration from the two timestamps
    pub fn new(start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Session {
            id: 0,
            start_time,
            end_time,
            duration: duration_hours(start_time, end_time),
        }
    }

    /// Same as [`Session::new`] but bound to an existing row id
    pub fn with_id(id: i64, start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Session {
            id,
            ..Session::new(start_time, end_time)
        }
    }

    pub fn start_text(&self) -> String {
        format_timestamp(&self.start_time)
    }

    pub fn end_text(&self) -> String {
        format_timestamp(&self.end_time)
    }
}

/// Optional date range used to narrow listing and aggregation.
///
/// A filter carries both bounds or neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl Filter {
    /// Filter matching sessions that start at or after `start` and end at or before `end`
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Filter {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Returns the bounds when both are set, `None` when neither is,
    /// and a validation error for a half-open filter.
    pub fn bounds(&self) -> Result<Option<(NaiveDateTime, NaiveDateTime)>> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok(Some((start, end))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(CoreError::Validation(
                "filter has a start bound but no end bound".to_string(),
            )),
            (None, Some(_)) => Err(CoreError::Validation(
                "filter has an end bound but no start bound".to_string(),
            )),
        }
    }
}

/// Aggregate over a set of sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Sum of durations, two decimals
    pub total_hours: String,
    pub record_count: i64,
}

/// Hours between two timestamps, rounded to two decimals
pub fn duration_hours(start: NaiveDateTime, end: NaiveDateTime) -> String {
    let seconds = (end - start).num_seconds() as f64;
    format!("{:.2}", seconds / 3600.0)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored or user-supplied timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM[:SS[.fff]]`, the same with a `T` separator,
/// and a bare `YYYY-MM-DD` meaning midnight.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();

    for fmt in ACCEPTED_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(ts);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts);
        }
    }

    Err(CoreError::Validation(format!(
        "invalid timestamp '{}', expected YYYY-MM-DD HH:MM[:SS]",
        input
    )))
}
