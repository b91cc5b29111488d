//! Core data model: days, stay intervals, selections, bookings and inventory.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StayError};

/// A calendar date with the time of day stripped. Ordering is by calendar day only.
pub type Day = NaiveDate;

/// Opaque booking identifier, as supplied by the booking store.
pub type BookingId = String;

/// Longest stay accepted, in nights. Longer spans are treated as bad input.
pub const MAX_STAY_NIGHTS: i64 = 730;

/// Half-open occupied span `[check_in, check_out)`.
///
/// The check-in night is occupied; the check-out day is free for a new arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayInterval {
    pub check_in: Day,
    pub check_out: Day,
}

impl StayInterval {
    /// Build a stay, rejecting `check_out <= check_in` and stays longer than
    /// [`MAX_STAY_NIGHTS`].
    pub fn new(check_in: Day, check_out: Day) -> Result<Self> {
        if check_out <= check_in {
            return Err(StayError::InvalidRange(format!(
                "check-out {} is not after check-in {}",
                check_out, check_in
            )));
        }
        let nights = (check_out - check_in).num_days();
        if nights > MAX_STAY_NIGHTS {
            return Err(StayError::InvalidRange(format!(
                "stay of {} nights exceeds the maximum of {}",
                nights, MAX_STAY_NIGHTS
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Canonical half-open overlap test. Symmetric in its arguments.
    pub fn overlaps(&self, other: &StayInterval) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    pub fn contains(&self, day: Day) -> bool {
        self.check_in <= day && day < self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Every occupied day, `check_in` up to but excluding `check_out`.
    pub fn occupied_days(&self) -> impl Iterator<Item = Day> {
        let start = self.check_in;
        (0..self.nights().max(0)).map(move |i| start + Duration::days(i))
    }
}

/// Inclusive `[start, end]` span of days, as produced by a UI selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Day,
    pub end: Day,
}

impl DateRange {
    /// Build a range from two endpoints in either order.
    pub fn between(a: Day, b: Day) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn single(day: Day) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn contains(&self, day: Day) -> bool {
        self.start <= day && day <= self.end
    }

    /// Every day from `start` through `end`, both included.
    pub fn days(&self) -> impl Iterator<Item = Day> {
        let start = self.start;
        let len = (self.end - self.start).num_days().max(-1) + 1;
        (0..len).map(move |i| start + Duration::days(i))
    }
}

/// A per-bed-type quantity: beds requested, consumed or remaining.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedCount {
    #[serde(default, alias = "singleBeds")]
    pub single: u32,
    #[serde(default, alias = "doubleBeds")]
    pub double: u32,
}

impl BedCount {
    pub fn new(single: u32, double: u32) -> Self {
        Self { single, double }
    }

    pub fn total(&self) -> u32 {
        self.single.saturating_add(self.double)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// True when both bed types in `self` cover `requested`.
    pub fn covers(&self, requested: &BedCount) -> bool {
        self.single >= requested.single && self.double >= requested.double
    }
}

/// What a booking takes from its room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BedsConsumed {
    Beds(BedCount),
    WholeRoom,
}

/// A fetched, normalized booking. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRecord {
    pub id: BookingId,
    pub room_id: Option<String>,
    pub stay: StayInterval,
    pub beds_consumed: BedsConsumed,
}

/// Bed inventory of a room. Private rooms are booked whole; shared rooms per bed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInventory {
    #[serde(alias = "isPrivate")]
    pub is_private: bool,
    #[serde(default, alias = "singleBeds")]
    pub single_beds: u32,
    #[serde(default, alias = "doubleBeds")]
    pub double_beds: u32,
}

impl RoomInventory {
    pub fn private() -> Self {
        Self {
            is_private: true,
            single_beds: 0,
            double_beds: 0,
        }
    }

    pub fn shared(single_beds: u32, double_beds: u32) -> Self {
        Self {
            is_private: false,
            single_beds,
            double_beds,
        }
    }

    pub fn beds(&self) -> BedCount {
        BedCount::new(self.single_beds, self.double_beds)
    }
}

/// Status of one calendar day. `Booked` is always derived from bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Available,
    Unavailable,
    Booked,
}

impl DayStatus {
    /// The other side of the operator toggle. `Booked` has no opposite.
    pub fn toggled(self) -> Option<DayStatus> {
        match self {
            DayStatus::Available => Some(DayStatus::Unavailable),
            DayStatus::Unavailable => Some(DayStatus::Available),
            DayStatus::Booked => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: Day,
    pub status: DayStatus,
}
