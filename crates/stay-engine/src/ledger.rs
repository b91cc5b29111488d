//! Per-bed-type capacity accounting for shared rooms.
//!
//! A shared room sells single and double beds separately. Remaining capacity
//! for a requested stay is the inventory minus the beds held by every booking
//! that shares a night with the stay, clamped at zero per bed type.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, StayError};
use crate::index::IntervalIndex;
use crate::model::{BedCount, BedsConsumed, BookingRecord, RoomInventory, StayInterval};

#[derive(Debug, Clone)]
pub struct BedCapacityLedger {
    inventory: RoomInventory,
    index: Arc<IntervalIndex>,
}

impl BedCapacityLedger {
    pub fn build(inventory: RoomInventory, bookings: &[BookingRecord]) -> Self {
        Self::from_index(
            inventory,
            Arc::new(IntervalIndex::build(bookings.to_vec(), &[])),
        )
    }

    /// Account against an index that is already built, sharing it.
    pub fn from_index(inventory: RoomInventory, index: Arc<IntervalIndex>) -> Self {
        debug!(
            single_beds = inventory.single_beds,
            double_beds = inventory.double_beds,
            bookings = index.bookings().len(),
            "built bed capacity ledger"
        );
        Self { inventory, index }
    }

    pub fn inventory(&self) -> RoomInventory {
        self.inventory
    }

    pub fn index(&self) -> &IntervalIndex {
        &self.index
    }

    /// Beds held by bookings overlapping `range`. A whole-room booking holds
    /// the full inventory.
    pub fn consumed(&self, range: &StayInterval) -> BedCount {
        self.index
            .overlapping(range)
            .into_iter()
            .fold(BedCount::default(), |acc, booking| {
                let held = match booking.beds_consumed {
                    BedsConsumed::Beds(beds) => beds,
                    BedsConsumed::WholeRoom => self.inventory.beds(),
                };
                BedCount::new(
                    acc.single.saturating_add(held.single),
                    acc.double.saturating_add(held.double),
                )
            })
    }

    /// Beds still free for `range`. With no range chosen, the full inventory.
    pub fn remaining(&self, range: Option<&StayInterval>) -> BedCount {
        let total = self.inventory.beds();
        let Some(range) = range else {
            return total;
        };
        let used = self.consumed(range);
        BedCount::new(
            total.single.saturating_sub(used.single),
            total.double.saturating_sub(used.double),
        )
    }
}

/// Bed quantities a guest has picked, bound to the stay they were picked for.
///
/// Quantities only make sense against the remaining capacity of one stay, so
/// any change of stay resets them to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BedSelection {
    range: Option<StayInterval>,
    chosen: BedCount,
}

impl BedSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(&self) -> Option<&StayInterval> {
        self.range.as_ref()
    }

    pub fn chosen(&self) -> BedCount {
        self.chosen
    }

    /// Change the stay. Resets chosen quantities when the stay actually changes.
    pub fn set_range(&mut self, range: Option<StayInterval>) {
        if self.range != range {
            self.range = range;
            self.chosen = BedCount::default();
        }
    }

    /// Pick quantities, checked against the ledger's capacity for the current stay.
    ///
    /// # Errors
    /// Returns `StayError::InvalidRange` if the quantities exceed what remains.
    pub fn choose(&mut self, ledger: &BedCapacityLedger, beds: BedCount) -> Result<()> {
        let remaining = ledger.remaining(self.range.as_ref());
        if !remaining.covers(&beds) {
            return Err(StayError::InvalidRange(format!(
                "requested {} single / {} double beds, {} / {} remain",
                beds.single, beds.double, remaining.single, remaining.double
            )));
        }
        self.chosen = beds;
        Ok(())
    }

    /// Hand over the stay and quantities for reservation, re-checked against
    /// `ledger` in case it was rebuilt since the quantities were chosen.
    ///
    /// # Errors
    /// Returns `StayError::NoActiveRange` without a stay and
    /// `StayError::InvalidRange` when no beds were chosen or they no longer fit.
    pub fn commit(&self, ledger: &BedCapacityLedger) -> Result<(StayInterval, BedCount)> {
        let range = self.range.ok_or(StayError::NoActiveRange)?;
        if self.chosen.is_empty() {
            return Err(StayError::InvalidRange("no beds chosen".to_string()));
        }
        let remaining = ledger.remaining(Some(&range));
        if !remaining.covers(&self.chosen) {
            return Err(StayError::InvalidRange(format!(
                "chosen beds exceed remaining capacity ({} single / {} double)",
                remaining.single, remaining.double
            )));
        }
        Ok((range, self.chosen))
    }
}
