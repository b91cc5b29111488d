//! # stay-engine
//!
//! Availability and conflict resolution for bookable rooms.
//!
//! Operators mark calendar days available or unavailable by dragging over a
//! calendar; search and booking flows ask whether a room can be booked for a
//! stay and how many beds a shared room has left. The engine is pure
//! computation over already-fetched data: it does not store bookings or
//! render calendars.
//!
//! Stays are half-open: the check-in night is occupied and the check-out day
//! is free for the next arrival.
//!
//! ## Modules
//!
//! - [`normalizer`]: `YYYY-MM-DD` / `YYYY-M-D` strings and native dates → [`Day`]
//! - [`ingest`]: raw booking records and disabled-date lists → normalized input
//! - [`index`]: day-keyed exclusion index with half-open overlap queries
//! - [`ledger`]: per-bed-type remaining capacity for shared rooms
//! - [`store`]: per-day statuses over a rolling horizon, with commit policies
//! - [`selection`]: drag-selection state machine feeding the store
//! - [`snapshot`]: immutable per-room builds and atomic refresh
//! - [`resolver`]: bookability verdicts for search and booking
//! - [`config`]: engine configuration
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod index;
pub mod ingest;
pub mod ledger;
pub mod model;
pub mod normalizer;
pub mod resolver;
pub mod selection;
pub mod snapshot;
pub mod store;

pub use config::EngineConfig;
pub use error::StayError;
pub use index::IntervalIndex;
pub use ingest::{ingest_bookings, DisabledDatesSource, RawBooking};
pub use ledger::{BedCapacityLedger, BedSelection};
pub use model::{
    BedCount, BedsConsumed, BookingRecord, CalendarDay, DateRange, Day, DayStatus, RoomInventory,
    StayInterval,
};
pub use normalizer::{format_day, normalize, parse_day};
pub use resolver::{AvailabilityResolver, Reason, Verdict};
pub use selection::{PointerEvent, SelectionController};
pub use snapshot::{RoomCalendar, RoomFeed, RoomSnapshot};
pub use store::{CommitOutcome, CommitPolicy, DayStatusStore};
