//! Tests for bookability verdicts on private and shared rooms.

use chrono::NaiveDate;
use stay_engine::{
    AvailabilityResolver, BedCount, DayStatus, DisabledDatesSource, RawBooking, Reason, RoomFeed,
    RoomInventory, RoomSnapshot, StayError, StayInterval, Verdict,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn raw(check_in: &str, check_out: &str, beds: Option<BedCount>) -> RawBooking {
    RawBooking {
        id: None,
        room_id: None,
        check_in: check_in.to_string(),
        check_out: check_out.to_string(),
        beds_consumed: beds,
    }
}

fn feed(inventory: RoomInventory, bookings: Vec<RawBooking>, disabled: &[&str]) -> RoomFeed {
    RoomFeed {
        room_id: Some("room-1".into()),
        inventory,
        bookings: Some(bookings),
        disabled_dates: Some(DisabledDatesSource::List(
            disabled.iter().map(|s| s.to_string()).collect(),
        )),
    }
}

fn snapshot(feed: &RoomFeed) -> RoomSnapshot {
    RoomSnapshot::build(feed, d(2025, 3, 1), 365)
}

fn private_room() -> RoomSnapshot {
    snapshot(&feed(
        RoomInventory::private(),
        vec![raw("2025-03-25", "2025-3-28", None)],
        &["2025-4-10"],
    ))
}

fn shared_room() -> RoomSnapshot {
    snapshot(&feed(
        RoomInventory::shared(2, 1),
        vec![
            raw("2025-04-01", "2025-04-03", Some(BedCount::new(1, 0))),
            raw("2025-04-02", "2025-04-04", Some(BedCount::new(1, 0))),
        ],
        &["2025-04-20"],
    ))
}

// ── Private rooms ───────────────────────────────────────────────────────────

#[test]
fn private_free_stay_is_bookable() {
    let snap = private_room();
    let verdict = AvailabilityResolver::new(&snap).can_book_private(Some(d(2025, 3, 10)), Some(d(2025, 3, 12)));
    assert_eq!(verdict, Verdict::Bookable);
}

#[test]
fn private_overlapping_stay_is_not_bookable() {
    let snap = private_room();
    let verdict = AvailabilityResolver::new(&snap).can_book_private(Some(d(2025, 3, 27)), Some(d(2025, 3, 30)));
    assert_eq!(verdict, Verdict::NotBookable(Reason::Overlap));
}

#[test]
fn private_arrival_on_checkout_day_is_bookable() {
    let snap = private_room();
    let resolver = AvailabilityResolver::new(&snap);

    assert!(resolver.can_book_private(Some(d(2025, 3, 28)), Some(d(2025, 3, 30))).is_bookable());
    assert!(resolver.can_book_private(Some(d(2025, 3, 20)), Some(d(2025, 3, 25))).is_bookable());
}

#[test]
fn private_stay_over_disabled_date_is_not_bookable() {
    let snap = private_room();
    let verdict = AvailabilityResolver::new(&snap).can_book_private(Some(d(2025, 4, 9)), Some(d(2025, 4, 11)));
    assert!(!verdict.is_bookable());
}

#[test]
fn degenerate_dates_fail_closed() {
    let snap = private_room();
    let resolver = AvailabilityResolver::new(&snap);
    let invalid = Verdict::NotBookable(Reason::InvalidRange);

    assert_eq!(resolver.can_book_private(Some(d(2025, 3, 12)), Some(d(2025, 3, 12))), invalid);
    assert_eq!(resolver.can_book_private(Some(d(2025, 3, 12)), Some(d(2025, 3, 10))), invalid);
    assert_eq!(resolver.can_book_private(None, Some(d(2025, 3, 10))), invalid);
    assert_eq!(resolver.can_book_private(Some(d(2025, 3, 10)), None), invalid);
}

#[test]
fn private_query_on_shared_room_is_rejected() {
    let snap = shared_room();
    let verdict = AvailabilityResolver::new(&snap).can_book_private(Some(d(2025, 5, 1)), Some(d(2025, 5, 2)));
    assert_eq!(verdict, Verdict::NotBookable(Reason::WrongRoomKind));
}

// ── Shared rooms ────────────────────────────────────────────────────────────

#[test]
fn shared_room_with_free_beds_is_bookable() {
    let snap = shared_room();
    let verdict = AvailabilityResolver::new(&snap).can_book_shared(
        Some(d(2025, 4, 1)),
        Some(d(2025, 4, 2)),
        BedCount::new(1, 1),
    );
    assert_eq!(verdict, Verdict::Bookable);
}

#[test]
fn shared_room_overlap_uses_bed_counts_not_blocking() {
    let snap = shared_room();
    let resolver = AvailabilityResolver::new(&snap);

    assert_eq!(
        resolver.can_book_shared(Some(d(2025, 4, 2)), Some(d(2025, 4, 3)), BedCount::new(1, 0)),
        Verdict::NotBookable(Reason::InsufficientBeds)
    );
    assert_eq!(
        resolver.can_book_shared(Some(d(2025, 4, 2)), Some(d(2025, 4, 3)), BedCount::new(0, 1)),
        Verdict::Bookable
    );
}

#[test]
fn empty_bed_request_is_not_bookable() {
    let snap = shared_room();
    let verdict = AvailabilityResolver::new(&snap).can_book_shared(
        Some(d(2025, 5, 1)),
        Some(d(2025, 5, 2)),
        BedCount::default(),
    );
    assert_eq!(verdict, Verdict::NotBookable(Reason::EmptyBedRequest));
}

#[test]
fn shared_stay_over_disabled_date_is_not_bookable() {
    let snap = shared_room();
    let verdict = AvailabilityResolver::new(&snap).can_book_shared(
        Some(d(2025, 4, 19)),
        Some(d(2025, 4, 21)),
        BedCount::new(1, 0),
    );
    assert_eq!(verdict, Verdict::NotBookable(Reason::UnavailableDay));
}

#[test]
fn can_book_dispatches_on_room_kind() {
    let private = private_room();
    let shared = shared_room();
    let stay = (Some(d(2025, 5, 1)), Some(d(2025, 5, 3)));

    assert!(AvailabilityResolver::new(&private)
        .can_book(stay.0, stay.1, BedCount::default())
        .is_bookable());
    assert!(!AvailabilityResolver::new(&shared)
        .can_book(stay.0, stay.1, BedCount::default())
        .is_bookable());
}

#[test]
fn remaining_beds_for_shared_room() {
    let snap = shared_room();
    let resolver = AvailabilityResolver::new(&snap);
    let stay = StayInterval::new(d(2025, 4, 2), d(2025, 4, 3)).unwrap();

    assert_eq!(resolver.remaining_beds(Some(&stay)).unwrap(), BedCount::new(0, 1));
    assert_eq!(resolver.remaining_beds(None).unwrap(), BedCount::new(2, 1));
}

#[test]
fn remaining_beds_on_private_room_is_an_error() {
    let snap = private_room();
    assert!(matches!(
        AvailabilityResolver::new(&snap).remaining_beds(None),
        Err(StayError::NotSharedRoom)
    ));
}

// ── Data readiness ──────────────────────────────────────────────────────────

#[test]
fn missing_bookings_yield_unknown_not_available() {
    let mut partial = feed(RoomInventory::private(), vec![], &[]);
    partial.bookings = None;
    let snap = snapshot(&partial);

    let verdict = AvailabilityResolver::new(&snap).can_book_private(Some(d(2025, 3, 10)), Some(d(2025, 3, 12)));

    assert!(snap.is_degraded());
    assert_eq!(verdict, Verdict::Unknown(Reason::DataNotReady));
}

#[test]
fn missing_disabled_dates_yield_unknown_for_shared_rooms() {
    let mut partial = feed(RoomInventory::shared(2, 0), vec![], &[]);
    partial.disabled_dates = None;
    let snap = snapshot(&partial);
    let resolver = AvailabilityResolver::new(&snap);

    assert_eq!(
        resolver.can_book_shared(Some(d(2025, 3, 10)), Some(d(2025, 3, 12)), BedCount::new(1, 0)),
        Verdict::Unknown(Reason::DataNotReady)
    );
    assert!(matches!(
        resolver.remaining_beds(None),
        Err(StayError::DataNotReady("disabled dates"))
    ));
}

#[test]
fn verdict_serializes_with_reason() {
    let json = serde_json::to_string(&Verdict::NotBookable(Reason::Overlap)).unwrap();
    assert_eq!(json, r#"{"verdict":"not_bookable","reason":"overlap"}"#);

    let json = serde_json::to_string(&Verdict::Bookable).unwrap();
    assert_eq!(json, r#"{"verdict":"bookable"}"#);
}

#[test]
fn overlong_stay_query_is_an_invalid_range() {
    let snap = private_room();
    let verdict = AvailabilityResolver::new(&snap)
        .can_book_private(Some(d(2025, 3, 1)), Some(d(2030, 3, 1)));
    assert_eq!(verdict, Verdict::NotBookable(Reason::InvalidRange));
}

// ── Edited day statuses ─────────────────────────────────────────────────────

#[test]
fn resolver_honours_the_given_store() {
    let snap = shared_room();
    let mut edited = snap.store().clone();
    edited.set_days(&[d(2025, 5, 10)], DayStatus::Unavailable);
    let stay = (Some(d(2025, 5, 9)), Some(d(2025, 5, 11)));

    assert!(AvailabilityResolver::new(&snap)
        .can_book_shared(stay.0, stay.1, BedCount::new(1, 0))
        .is_bookable());
    assert_eq!(
        AvailabilityResolver::with_store(&snap, &edited).can_book_shared(
            stay.0,
            stay.1,
            BedCount::new(1, 0)
        ),
        Verdict::NotBookable(Reason::UnavailableDay)
    );
}
