//! Immutable per-room snapshots and the calendar that swaps them.
//!
//! A snapshot bundles everything built from one load of a room's data: the
//! exclusion index, the bed ledger for shared rooms, and the derived day
//! statuses. Snapshots are never mutated. A refresh builds a new one and
//! swaps the `Arc`, so a reader holding the old snapshot keeps a consistent view.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{Result, StayError};
use crate::index::IntervalIndex;
use crate::ingest::{ingest_bookings, DisabledDatesSource, RawBooking};
use crate::ledger::BedCapacityLedger;
use crate::model::{Day, DayStatus, RoomInventory};
use crate::resolver::AvailabilityResolver;
use crate::selection::{PointerEvent, SelectionController};
use crate::store::{CommitOutcome, DayStatusStore};

/// One room's inputs as delivered by external collaborators.
///
/// `None` for `bookings` or `disabled_dates` means that input has not finished
/// loading; an empty list means it loaded and is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomFeed {
    #[serde(default, alias = "roomId")]
    pub room_id: Option<String>,
    pub inventory: RoomInventory,
    #[serde(default)]
    pub bookings: Option<Vec<RawBooking>>,
    #[serde(default, alias = "disabledDates")]
    pub disabled_dates: Option<DisabledDatesSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readiness {
    pub bookings_loaded: bool,
    pub disabled_dates_loaded: bool,
}

impl Readiness {
    pub fn is_complete(&self) -> bool {
        self.bookings_loaded && self.disabled_dates_loaded
    }

    /// The first input still missing, if any.
    pub fn missing(&self) -> Option<&'static str> {
        if !self.bookings_loaded {
            Some("bookings")
        } else if !self.disabled_dates_loaded {
            Some("disabled dates")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    room_id: Option<String>,
    inventory: RoomInventory,
    readiness: Readiness,
    index: Arc<IntervalIndex>,
    ledger: Option<BedCapacityLedger>,
    store: DayStatusStore,
}

impl RoomSnapshot {
    pub fn build(feed: &RoomFeed, today: Day, horizon_days: u32) -> Self {
        let readiness = Readiness {
            bookings_loaded: feed.bookings.is_some(),
            disabled_dates_loaded: feed.disabled_dates.is_some(),
        };
        if let Some(missing) = readiness.missing() {
            warn!(room = ?feed.room_id, missing, "building degraded room snapshot");
        }

        let bookings = feed
            .bookings
            .as_deref()
            .map(ingest_bookings)
            .unwrap_or_default();
        let disabled = feed
            .disabled_dates
            .as_ref()
            .map(DisabledDatesSource::resolve)
            .unwrap_or_default();

        let index = Arc::new(IntervalIndex::build(bookings, &disabled));
        let ledger = (!feed.inventory.is_private)
            .then(|| BedCapacityLedger::from_index(feed.inventory, Arc::clone(&index)));
        let store = DayStatusStore::build(&index, today, horizon_days);

        Self {
            room_id: feed.room_id.clone(),
            inventory: feed.inventory,
            readiness,
            index,
            ledger,
            store,
        }
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    pub fn inventory(&self) -> RoomInventory {
        self.inventory
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    /// Built from partial data; negative answers from it are not authoritative.
    pub fn is_degraded(&self) -> bool {
        !self.readiness.is_complete()
    }

    /// # Errors
    /// Returns `StayError::DataNotReady` naming the missing input.
    pub fn ensure_ready(&self) -> Result<()> {
        match self.readiness.missing() {
            Some(missing) => Err(StayError::DataNotReady(missing)),
            None => Ok(()),
        }
    }

    pub fn index(&self) -> &IntervalIndex {
        &self.index
    }

    /// Present only for shared rooms.
    pub fn ledger(&self) -> Option<&BedCapacityLedger> {
        self.ledger.as_ref()
    }

    pub fn store(&self) -> &DayStatusStore {
        &self.store
    }
}

/// A room's calendar as an operator edits it: the latest snapshot plus a
/// working copy of its day statuses driven by drag selection.
#[derive(Debug, Clone)]
pub struct RoomCalendar {
    config: EngineConfig,
    snapshot: Arc<RoomSnapshot>,
    working: DayStatusStore,
    selection: SelectionController,
}

impl RoomCalendar {
    /// Build with "today" taken from the configured timezone.
    ///
    /// # Errors
    /// Returns `StayError::InvalidTimezone` for a bad timezone in `config` and
    /// `StayError::InvalidConfig` for an oversized horizon.
    pub fn new(feed: &RoomFeed, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let today = config.today()?;
        Ok(Self::with_today(feed, config, today))
    }

    pub fn with_today(feed: &RoomFeed, config: EngineConfig, today: Day) -> Self {
        let snapshot = Arc::new(RoomSnapshot::build(feed, today, config.horizon_days));
        let working = snapshot.store().clone();
        let selection = SelectionController::from_config(&config);
        Self {
            config,
            snapshot,
            working,
            selection,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current snapshot, for search and booking queries.
    pub fn snapshot(&self) -> Arc<RoomSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// The working day statuses, including uncommitted-to-persistence edits.
    pub fn store(&self) -> &DayStatusStore {
        &self.working
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Verdicts over the current snapshot that honour the operator's edits.
    pub fn resolver(&self) -> AvailabilityResolver<'_> {
        AvailabilityResolver::with_store(&self.snapshot, &self.working)
    }

    /// Swap in a snapshot built from `feed`. Operator edits in the working
    /// store survive on days the new data does not book.
    pub fn refresh(&mut self, feed: &RoomFeed) {
        let next = Arc::new(RoomSnapshot::build(
            feed,
            self.working.today(),
            self.config.horizon_days,
        ));
        self.working = self.working.rebase(next.index());
        self.snapshot = next;
        self.selection.reconcile(&self.working);
        info!(
            room = ?self.snapshot.room_id(),
            degraded = self.snapshot.is_degraded(),
            "room snapshot swapped"
        );
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<CommitOutcome> {
        self.selection.handle(&mut self.working, event)
    }

    /// Status to render for `day`, with any pending selection preview applied.
    pub fn view(&self, day: Day) -> Option<DayStatus> {
        self.selection.view(&self.working, day)
    }

    pub fn export_unavailable(&self) -> Vec<Day> {
        self.working.export_unavailable()
    }

    pub fn export_unavailable_iso(&self) -> Vec<String> {
        self.working.export_unavailable_iso()
    }
}
