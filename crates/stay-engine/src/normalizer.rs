//! Date normalization -- turns heterogeneous date inputs into a canonical [`Day`].
//!
//! Booking stores and property records disagree on date formats: some emit
//! zero-padded ISO dates (`2025-03-05`), others a non-padded custom form
//! (`2025-3-5`), and native hosts hand over date or datetime values. Every
//! form is collapsed to a day here, with any time of day dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::{Result, StayError};
use crate::model::Day;

/// Any date representation accepted by [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateInput<'a> {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(&'a str),
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(d: NaiveDate) -> Self {
        DateInput::Date(d)
    }
}

impl From<NaiveDateTime> for DateInput<'_> {
    fn from(dt: NaiveDateTime) -> Self {
        DateInput::DateTime(dt)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput<'_> {
    /// Keeps the wall-clock date in the value's own timezone.
    fn from(dt: DateTime<Tz>) -> Self {
        DateInput::DateTime(dt.naive_local())
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(s: &'a str) -> Self {
        DateInput::Text(s)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(s: &'a String) -> Self {
        DateInput::Text(s.as_str())
    }
}

/// Normalize any supported date input to a [`Day`].
///
/// # Errors
/// Returns `StayError::DateParse` for non-numeric components or an
/// out-of-range month or day.
pub fn normalize<'a>(input: impl Into<DateInput<'a>>) -> Result<Day> {
    match input.into() {
        DateInput::Date(d) => Ok(d),
        DateInput::DateTime(dt) => Ok(dt.date()),
        DateInput::Text(s) => parse_day(s),
    }
}

/// Parse a date string in either `YYYY-MM-DD` or `YYYY-M-D` form.
///
/// Zero-padded ISO input may carry a trailing time (`2025-03-05T14:00:00`),
/// which is ignored. Anything else is split on `-` into three integer
/// components.
pub fn parse_day(input: &str) -> Result<Day> {
    let s = input.trim();

    if is_padded_iso(s) {
        return NaiveDate::parse_from_str(&s[..10], "%Y-%m-%d")
            .map_err(|e| StayError::date_parse(input, e.to_string()));
    }

    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 3 {
        return Err(StayError::date_parse(
            input,
            "expected three '-' separated components",
        ));
    }

    let year: i32 = parse_component(input, parts[0], "year")?;
    let month: u32 = parse_component(input, parts[1], "month")?;
    let day: u32 = parse_component(input, parts[2], "day")?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| StayError::date_parse(input, "month or day out of range"))
}

/// Format a day as a zero-padded ISO string, the form handed back to persistence.
pub fn format_day(day: Day) -> String {
    day.format("%Y-%m-%d").to_string()
}

fn parse_component<T: std::str::FromStr>(input: &str, part: &str, what: &str) -> Result<T> {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StayError::date_parse(
            input,
            format!("{} '{}' is not numeric", what, part),
        ));
    }
    part.parse()
        .map_err(|_| StayError::date_parse(input, format!("{} '{}' is not numeric", what, part)))
}

/// `YYYY-MM-DD`, optionally followed by a `T` or space and a time part.
fn is_padded_iso(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() < 10 {
        return false;
    }
    let digits = |range: std::ops::Range<usize>| b[range].iter().all(u8::is_ascii_digit);
    let shape = digits(0..4) && b[4] == b'-' && digits(5..7) && b[7] == b'-' && digits(8..10);
    shape && (b.len() == 10 || b[10] == b'T' || b[10] == b' ')
}
