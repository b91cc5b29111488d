//! Error types for stay-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StayError {
    #[error("Invalid date '{input}': {reason}")]
    DateParse { input: String, reason: String },

    /// A query reached an index or ledger whose inputs had not finished loading.
    /// The payload names the missing input.
    #[error("Data not ready: {0} not loaded")]
    DataNotReady(&'static str),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Disabled dates JSON error: {0}")]
    DisabledDatesJson(#[from] serde_json::Error),

    #[error("No stay dates chosen")]
    NoActiveRange,

    #[error("Room is booked whole; it has no per-bed capacity")]
    NotSharedRoom,
}

impl StayError {
    pub(crate) fn date_parse(input: &str, reason: impl Into<String>) -> Self {
        StayError::DateParse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StayError>;
