//! Engine configuration.
//!
//! Every field has a default, so an empty document is a valid configuration.

use chrono::Utc;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StayError};
use crate::model::Day;
use crate::store::CommitPolicy;

pub const DEFAULT_HORIZON_DAYS: u32 = 365;

/// Upper bound on `horizon_days`. Stores built with a larger horizon are cut
/// to this length.
pub const MAX_HORIZON_DAYS: u32 = 3660;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How a finished drag selection changes the calendar.
    pub commit_policy: CommitPolicy,
    /// Show the pending status of a drag selection before it is committed.
    pub instant_feedback: bool,
    /// Days after today covered by the editable calendar.
    pub horizon_days: u32,
    /// IANA timezone used to decide what "today" is. UTC when unset.
    pub timezone: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            commit_policy: CommitPolicy::default(),
            instant_feedback: false,
            horizon_days: DEFAULT_HORIZON_DAYS,
            timezone: None,
        }
    }
}

impl EngineConfig {
    /// Check the fields that cannot be range-checked by deserialization.
    ///
    /// # Errors
    /// Returns `StayError::InvalidConfig` for a horizon above [`MAX_HORIZON_DAYS`]
    /// and `StayError::InvalidTimezone` for an unknown timezone.
    pub fn validate(&self) -> Result<()> {
        if self.horizon_days > MAX_HORIZON_DAYS {
            return Err(StayError::InvalidConfig(format!(
                "horizon_days {} exceeds the maximum of {}",
                self.horizon_days, MAX_HORIZON_DAYS
            )));
        }
        self.tz().map(|_| ())
    }

    /// The configured timezone.
    ///
    /// # Errors
    /// Returns `StayError::InvalidTimezone` if the name is not a valid IANA identifier.
    pub fn tz(&self) -> Result<Tz> {
        match &self.timezone {
            None => Ok(Tz::UTC),
            Some(name) => name
                .parse()
                .map_err(|_| StayError::InvalidTimezone(name.clone())),
        }
    }

    /// Today's date in the configured timezone.
    pub fn today(&self) -> Result<Day> {
        let tz = self.tz()?;
        Ok(Utc::now().with_timezone(&tz).date_naive())
    }
}
