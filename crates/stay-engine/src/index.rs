//! Day-keyed exclusion index over bookings and disabled dates.
//!
//! Each booking is expanded into its occupied days once at build time, so
//! "is this day excluded?" is a hash lookup and an overlap query costs one
//! lookup per requested night, independent of how many bookings the room has.
//! Overlap is half-open: a booking's check-out day is free.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::model::{BookingRecord, Day, StayInterval};

/// Why a day is excluded. A booking wins over a disabled date on the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Booked,
    Disabled,
}

#[derive(Debug, Clone, Default)]
pub struct IntervalIndex {
    bookings: Vec<BookingRecord>,
    /// Occupied day → positions in `bookings`.
    by_day: HashMap<Day, Vec<usize>>,
    disabled: HashSet<Day>,
}

impl IntervalIndex {
    pub fn build(bookings: Vec<BookingRecord>, disabled_dates: &[Day]) -> Self {
        let mut by_day: HashMap<Day, Vec<usize>> = HashMap::new();
        for (pos, booking) in bookings.iter().enumerate() {
            for day in booking.stay.occupied_days() {
                by_day.entry(day).or_default().push(pos);
            }
        }
        let disabled: HashSet<Day> = disabled_dates.iter().copied().collect();

        debug!(
            bookings = bookings.len(),
            occupied_days = by_day.len(),
            disabled = disabled.len(),
            "built interval index"
        );

        Self {
            bookings,
            by_day,
            disabled,
        }
    }

    pub fn is_excluded(&self, day: Day) -> bool {
        self.exclusion(day).is_some()
    }

    pub fn exclusion(&self, day: Day) -> Option<Exclusion> {
        if self.is_booked(day) {
            Some(Exclusion::Booked)
        } else if self.is_disabled(day) {
            Some(Exclusion::Disabled)
        } else {
            None
        }
    }

    pub fn is_booked(&self, day: Day) -> bool {
        self.by_day.contains_key(&day)
    }

    pub fn is_disabled(&self, day: Day) -> bool {
        self.disabled.contains(&day)
    }

    /// True if `range` shares a night with any booking or contains a disabled date.
    pub fn overlaps(&self, range: &StayInterval) -> bool {
        range
            .occupied_days()
            .any(|day| self.by_day.contains_key(&day) || self.disabled.contains(&day))
    }

    /// Every booking sharing at least one night with `range`, each reported once,
    /// in build order.
    pub fn overlapping(&self, range: &StayInterval) -> Vec<&BookingRecord> {
        let positions: BTreeSet<usize> = range
            .occupied_days()
            .filter_map(|day| self.by_day.get(&day))
            .flatten()
            .copied()
            .collect();
        positions.into_iter().map(|p| &self.bookings[p]).collect()
    }

    /// Bookings occupying `day`.
    pub fn bookings_on(&self, day: Day) -> impl Iterator<Item = &BookingRecord> {
        self.by_day
            .get(&day)
            .into_iter()
            .flatten()
            .map(move |&p| &self.bookings[p])
    }

    pub fn bookings(&self) -> &[BookingRecord] {
        &self.bookings
    }

    /// Disabled dates in ascending order.
    pub fn disabled_dates(&self) -> Vec<Day> {
        let mut days: Vec<Day> = self.disabled.iter().copied().collect();
        days.sort();
        days
    }
}
