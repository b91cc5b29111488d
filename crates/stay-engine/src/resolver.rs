//! Bookability verdicts for search and booking flows.
//!
//! Every query produces a well-formed [`Verdict`]. Bad input fails closed as
//! `NotBookable`; a snapshot built from partial data answers `Unknown` rather
//! than letting a room look free because its bookings had not arrived yet.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StayError};
use crate::model::{BedCount, Day, DayStatus, StayInterval};
use crate::snapshot::RoomSnapshot;
use crate::store::DayStatusStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Dates missing, or check-out not after check-in.
    InvalidRange,
    /// A booking or disabled date falls inside the stay.
    Overlap,
    /// A day of the stay is marked unavailable.
    UnavailableDay,
    InsufficientBeds,
    EmptyBedRequest,
    /// Private query on a shared room or the other way round.
    WrongRoomKind,
    DataNotReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    Bookable,
    NotBookable(Reason),
    Unknown(Reason),
}

impl Verdict {
    pub fn is_bookable(&self) -> bool {
        matches!(self, Verdict::Bookable)
    }
}

impl From<StayError> for Verdict {
    fn from(err: StayError) -> Self {
        match err {
            StayError::DataNotReady(_) => Verdict::Unknown(Reason::DataNotReady),
            StayError::NotSharedRoom => Verdict::NotBookable(Reason::WrongRoomKind),
            _ => Verdict::NotBookable(Reason::InvalidRange),
        }
    }
}

/// Validate raw stay dates into a [`StayInterval`].
///
/// # Errors
/// Returns `StayError::InvalidRange` if either date is missing or check-out is
/// not after check-in.
pub fn stay_from(check_in: Option<Day>, check_out: Option<Day>) -> Result<StayInterval> {
    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) => StayInterval::new(check_in, check_out),
        _ => Err(StayError::InvalidRange("check-in and check-out are both required".into())),
    }
}

/// Read-only façade over one room snapshot and the day statuses to honour.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityResolver<'a> {
    snapshot: &'a RoomSnapshot,
    store: &'a DayStatusStore,
}

impl<'a> AvailabilityResolver<'a> {
    /// Resolve against the snapshot and the day statuses it was built with.
    pub fn new(snapshot: &'a RoomSnapshot) -> Self {
        Self {
            snapshot,
            store: snapshot.store(),
        }
    }

    /// Resolve against the snapshot's bookings but `store`'s day statuses,
    /// so days an operator marked unavailable are honoured.
    pub fn with_store(snapshot: &'a RoomSnapshot, store: &'a DayStatusStore) -> Self {
        Self { snapshot, store }
    }

    /// Whole-room check: no booking, disabled date or unavailable day inside the stay.
    pub fn can_book_private(&self, check_in: Option<Day>, check_out: Option<Day>) -> Verdict {
        if !self.snapshot.inventory().is_private {
            return Verdict::NotBookable(Reason::WrongRoomKind);
        }
        let stay = match stay_from(check_in, check_out) {
            Ok(stay) => stay,
            Err(e) => return e.into(),
        };
        if let Err(e) = self.snapshot.ensure_ready() {
            return e.into();
        }

        if self.snapshot.index().overlaps(&stay) {
            return Verdict::NotBookable(Reason::Overlap);
        }
        if self.has_unavailable_day(&stay) {
            return Verdict::NotBookable(Reason::UnavailableDay);
        }
        Verdict::Bookable
    }

    /// Per-bed check: the stay's dates are open and enough beds of each type remain.
    pub fn can_book_shared(
        &self,
        check_in: Option<Day>,
        check_out: Option<Day>,
        requested: BedCount,
    ) -> Verdict {
        let Some(ledger) = self.snapshot.ledger() else {
            return Verdict::NotBookable(Reason::WrongRoomKind);
        };
        if requested.is_empty() {
            return Verdict::NotBookable(Reason::EmptyBedRequest);
        }
        let stay = match stay_from(check_in, check_out) {
            Ok(stay) => stay,
            Err(e) => return e.into(),
        };
        if let Err(e) = self.snapshot.ensure_ready() {
            return e.into();
        }

        let index = self.snapshot.index();
        if stay.occupied_days().any(|d| index.is_disabled(d)) || self.has_unavailable_day(&stay) {
            return Verdict::NotBookable(Reason::UnavailableDay);
        }
        if !ledger.remaining(Some(&stay)).covers(&requested) {
            return Verdict::NotBookable(Reason::InsufficientBeds);
        }
        Verdict::Bookable
    }

    /// Dispatch on room kind. `requested` is ignored for private rooms.
    pub fn can_book(
        &self,
        check_in: Option<Day>,
        check_out: Option<Day>,
        requested: BedCount,
    ) -> Verdict {
        if self.snapshot.inventory().is_private {
            self.can_book_private(check_in, check_out)
        } else {
            self.can_book_shared(check_in, check_out, requested)
        }
    }

    /// Beds still free for `stay`; the full inventory when no stay is chosen.
    ///
    /// # Errors
    /// Returns `StayError::NotSharedRoom` for private rooms and
    /// `StayError::DataNotReady` for a degraded snapshot.
    pub fn remaining_beds(&self, stay: Option<&StayInterval>) -> Result<BedCount> {
        let ledger = self.snapshot.ledger().ok_or(StayError::NotSharedRoom)?;
        self.snapshot.ensure_ready()?;
        Ok(ledger.remaining(stay))
    }

    fn has_unavailable_day(&self, stay: &StayInterval) -> bool {
        stay.occupied_days()
            .any(|d| self.store.get(d) == Some(DayStatus::Unavailable))
    }
}
