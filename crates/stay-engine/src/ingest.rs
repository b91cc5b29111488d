//! Ingestion of raw booking records and disabled-date lists.
//!
//! External collaborators hand over loosely typed data: date strings in two
//! formats, optional bed counts, and disabled dates that are sometimes a JSON
//! array and sometimes a JSON-encoded string holding that array. Bad records
//! are skipped with a warning; ingestion never fails as a whole.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{BedCount, BedsConsumed, BookingRecord, Day, StayInterval};
use crate::normalizer::{normalize, parse_day, DateInput};

/// A booking as it arrives from the booking store, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBooking {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default, alias = "roomId")]
    pub room_id: Option<String>,
    #[serde(alias = "checkIn")]
    pub check_in: String,
    #[serde(alias = "checkOut")]
    pub check_out: String,
    /// Absent for whole-room bookings.
    #[serde(default, alias = "bedsConsumed")]
    pub beds_consumed: Option<BedCount>,
}

/// Normalize one raw booking.
///
/// # Errors
/// Returns `StayError::DateParse` for an unparseable date and
/// `StayError::InvalidRange` when check-out is not after check-in.
pub fn normalize_booking(raw: &RawBooking, fallback_id: usize) -> Result<BookingRecord> {
    let check_in = normalize(DateInput::Text(&raw.check_in))?;
    let check_out = normalize(DateInput::Text(&raw.check_out))?;
    let stay = StayInterval::new(check_in, check_out)?;

    Ok(BookingRecord {
        id: raw
            .id
            .clone()
            .unwrap_or_else(|| format!("booking-{}", fallback_id)),
        room_id: raw.room_id.clone(),
        stay,
        beds_consumed: match raw.beds_consumed {
            Some(beds) => BedsConsumed::Beds(beds),
            None => BedsConsumed::WholeRoom,
        },
    })
}

/// Normalize a batch of raw bookings, skipping the records that fail.
pub fn ingest_bookings(raw: &[RawBooking]) -> Vec<BookingRecord> {
    let records: Vec<BookingRecord> = raw
        .iter()
        .enumerate()
        .filter_map(|(i, r)| match normalize_booking(r, i) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index = i, id = ?r.id, error = %e, "skipping booking record");
                None
            }
        })
        .collect();

    debug!(
        received = raw.len(),
        kept = records.len(),
        "ingested bookings"
    );
    records
}

/// Disabled dates as supplied by the property record.
///
/// Deserializes from any JSON value: a list keeps its string entries, a string
/// is kept encoded, and anything else becomes an empty list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisabledDatesSource {
    /// A plain list of date strings.
    List(Vec<String>),
    /// A JSON-encoded string whose content is a list of date strings.
    Encoded(String),
}

impl Default for DisabledDatesSource {
    fn default() -> Self {
        DisabledDatesSource::List(Vec::new())
    }
}

impl<'de> Deserialize<'de> for DisabledDatesSource {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => DisabledDatesSource::List(string_entries(items)),
            Value::String(encoded) => DisabledDatesSource::Encoded(encoded),
            other => {
                warn!(value = %other, "disabled dates are not a list, treating as empty");
                DisabledDatesSource::default()
            }
        })
    }
}

impl DisabledDatesSource {
    /// Resolve to parsed days. Malformed outer JSON yields an empty list;
    /// unparseable entries are dropped individually.
    pub fn resolve(&self) -> Vec<Day> {
        let strings = match self {
            DisabledDatesSource::List(list) => list.clone(),
            DisabledDatesSource::Encoded(encoded) => match decode_disabled_dates(encoded) {
                Ok(list) => list,
                Err(e) => {
                    warn!(error = %e, "malformed disabled dates JSON, treating as empty");
                    Vec::new()
                }
            },
        };
        parse_disabled_dates(&strings)
    }
}

/// Decode the outer JSON layer of an encoded disabled-dates list.
///
/// An empty or whitespace-only string is an empty list.
pub fn decode_disabled_dates(encoded: &str) -> Result<Vec<String>> {
    if encoded.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items: Vec<Value> = serde_json::from_str(encoded)?;
    Ok(string_entries(items))
}

/// Keep the string entries of a JSON list, dropping the rest with a warning.
fn string_entries(items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            other => {
                warn!(entry = %other, "skipping non-string disabled date");
                None
            }
        })
        .collect()
}

/// Parse each disabled-date string, skipping the ones that fail.
pub fn parse_disabled_dates<S: AsRef<str>>(dates: &[S]) -> Vec<Day> {
    dates
        .iter()
        .filter_map(|s| match parse_day(s.as_ref()) {
            Ok(day) => Some(day),
            Err(e) => {
                warn!(error = %e, "skipping disabled date");
                None
            }
        })
        .collect()
}
