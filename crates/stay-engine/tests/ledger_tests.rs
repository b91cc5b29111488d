//! Tests for shared-room bed accounting and caller-side bed selection.

use chrono::NaiveDate;
use stay_engine::{
    BedCapacityLedger, BedCount, BedSelection, BedsConsumed, BookingRecord, RoomInventory,
    StayError, StayInterval,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn stay(a: NaiveDate, b: NaiveDate) -> StayInterval {
    StayInterval::new(a, b).unwrap()
}

fn beds(id: &str, a: NaiveDate, b: NaiveDate, single: u32, double: u32) -> BookingRecord {
    BookingRecord {
        id: id.to_string(),
        room_id: None,
        stay: stay(a, b),
        beds_consumed: BedsConsumed::Beds(BedCount::new(single, double)),
    }
}

fn two_overlapping_single_bookings() -> BedCapacityLedger {
    BedCapacityLedger::build(
        RoomInventory::shared(2, 0),
        &[
            beds("a", d(2025, 4, 1), d(2025, 4, 3), 1, 0),
            beds("b", d(2025, 4, 2), d(2025, 4, 4), 1, 0),
        ],
    )
}

// ── Remaining capacity ──────────────────────────────────────────────────────

#[test]
fn overlapping_bookings_exhaust_single_beds() {
    let ledger = two_overlapping_single_bookings();

    let remaining = ledger.remaining(Some(&stay(d(2025, 4, 2), d(2025, 4, 3))));

    assert_eq!(remaining.single, 0);
}

#[test]
fn checkout_day_releases_beds() {
    let ledger = two_overlapping_single_bookings();

    // Booking A checks out on the 3rd, so only B holds a bed that night.
    let remaining = ledger.remaining(Some(&stay(d(2025, 4, 3), d(2025, 4, 4))));

    assert_eq!(remaining.single, 1);
}

#[test]
fn no_range_reports_full_inventory() {
    let ledger = two_overlapping_single_bookings();
    assert_eq!(ledger.remaining(None), BedCount::new(2, 0));
}

#[test]
fn remaining_is_clamped_at_zero() {
    let ledger = BedCapacityLedger::build(
        RoomInventory::shared(1, 1),
        &[
            beds("a", d(2025, 4, 1), d(2025, 4, 5), 3, 2),
            beds("b", d(2025, 4, 2), d(2025, 4, 3), 1, 1),
        ],
    );

    let remaining = ledger.remaining(Some(&stay(d(2025, 4, 1), d(2025, 4, 5))));

    assert_eq!(remaining, BedCount::new(0, 0));
    assert_eq!(ledger.consumed(&stay(d(2025, 4, 1), d(2025, 4, 5))), BedCount::new(4, 3));
}

#[test]
fn bed_types_are_tracked_separately() {
    let ledger = BedCapacityLedger::build(
        RoomInventory::shared(4, 2),
        &[beds("a", d(2025, 4, 1), d(2025, 4, 3), 1, 2)],
    );

    let remaining = ledger.remaining(Some(&stay(d(2025, 4, 2), d(2025, 4, 6))));

    assert_eq!(remaining, BedCount::new(3, 0));
}

#[test]
fn whole_room_booking_takes_every_bed() {
    let ledger = BedCapacityLedger::build(
        RoomInventory::shared(4, 2),
        &[BookingRecord {
            id: "w".into(),
            room_id: None,
            stay: stay(d(2025, 4, 1), d(2025, 4, 2)),
            beds_consumed: BedsConsumed::WholeRoom,
        }],
    );

    assert_eq!(
        ledger.remaining(Some(&stay(d(2025, 4, 1), d(2025, 4, 2)))),
        BedCount::new(0, 0)
    );
}

// ── Bed selection ───────────────────────────────────────────────────────────

#[test]
fn changing_range_resets_chosen_beds() {
    let ledger = BedCapacityLedger::build(RoomInventory::shared(3, 1), &[]);
    let mut selection = BedSelection::new();
    selection.set_range(Some(stay(d(2025, 5, 1), d(2025, 5, 3))));
    selection.choose(&ledger, BedCount::new(2, 1)).unwrap();

    selection.set_range(Some(stay(d(2025, 5, 1), d(2025, 5, 4))));

    assert_eq!(selection.chosen(), BedCount::default());
}

#[test]
fn setting_same_range_keeps_chosen_beds() {
    let ledger = BedCapacityLedger::build(RoomInventory::shared(3, 1), &[]);
    let range = stay(d(2025, 5, 1), d(2025, 5, 3));
    let mut selection = BedSelection::new();
    selection.set_range(Some(range));
    selection.choose(&ledger, BedCount::new(1, 0)).unwrap();

    selection.set_range(Some(range));

    assert_eq!(selection.chosen(), BedCount::new(1, 0));
}

#[test]
fn choosing_more_than_remaining_is_rejected() {
    let ledger = two_overlapping_single_bookings();
    let mut selection = BedSelection::new();
    selection.set_range(Some(stay(d(2025, 4, 2), d(2025, 4, 3))));

    let result = selection.choose(&ledger, BedCount::new(1, 0));

    assert!(matches!(result, Err(StayError::InvalidRange(_))));
    assert_eq!(selection.chosen(), BedCount::default());
}

#[test]
fn commit_without_range_is_refused() {
    let ledger = BedCapacityLedger::build(RoomInventory::shared(2, 0), &[]);
    let mut selection = BedSelection::new();
    selection.choose(&ledger, BedCount::new(1, 0)).unwrap();

    assert!(matches!(selection.commit(&ledger), Err(StayError::NoActiveRange)));
}

#[test]
fn commit_rechecks_against_rebuilt_ledger() {
    let empty = BedCapacityLedger::build(RoomInventory::shared(2, 0), &[]);
    let range = stay(d(2025, 4, 2), d(2025, 4, 3));
    let mut selection = BedSelection::new();
    selection.set_range(Some(range));
    selection.choose(&empty, BedCount::new(1, 0)).unwrap();
    assert_eq!(selection.commit(&empty).unwrap(), (range, BedCount::new(1, 0)));

    let full = two_overlapping_single_bookings();
    assert!(selection.commit(&full).is_err());
}

#[test]
fn commit_with_no_beds_is_refused() {
    let ledger = BedCapacityLedger::build(RoomInventory::shared(2, 0), &[]);
    let mut selection = BedSelection::new();
    selection.set_range(Some(stay(d(2025, 4, 2), d(2025, 4, 3))));

    assert!(selection.commit(&ledger).is_err());
}
