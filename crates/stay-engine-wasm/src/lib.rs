//! WASM bindings for stay-engine.
//!
//! Exposes day statuses, bookability verdicts, remaining bed counts and drag
//! selection to JavaScript via `wasm-bindgen`. All complex types are passed as
//! JSON strings. Dates may be given as `YYYY-MM-DD` or `YYYY-M-D`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p stay-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/stay-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/stay_engine_wasm.wasm
//! ```

use serde::{Deserialize, Serialize};
use stay_engine::{
    format_day, parse_day, AvailabilityResolver, BedCount, CommitOutcome, Day, DayStatus,
    EngineConfig, PointerEvent, RoomCalendar, RoomFeed, RoomSnapshot, StayInterval, Verdict,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CalendarDayDto {
    date: String,
    status: DayStatus,
}

#[derive(Serialize)]
struct DayStatusesDto {
    degraded: bool,
    days: Vec<CalendarDayDto>,
}

#[derive(Serialize)]
struct CommitOutcomeDto {
    target: DayStatus,
    changed: Vec<String>,
}

impl From<&CommitOutcome> for CommitOutcomeDto {
    fn from(o: &CommitOutcome) -> Self {
        Self {
            target: o.target,
            changed: o.changed.iter().copied().map(format_day).collect(),
        }
    }
}

#[derive(Serialize)]
struct SelectionResultDto {
    outcomes: Vec<CommitOutcomeDto>,
    unavailable: Vec<String>,
}

/// Input format for pointer events passed from JavaScript.
#[derive(Deserialize)]
struct PointerEventInput {
    event: String,
    #[serde(default)]
    day: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers (plain `String` errors so they can be exercised off-wasm)
// ---------------------------------------------------------------------------

fn parse_feed(json: &str) -> Result<RoomFeed, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid room feed JSON: {}", e))
}

fn parse_config(json: Option<&str>) -> Result<EngineConfig, String> {
    match json {
        None => Ok(EngineConfig::default()),
        Some(s) if s.trim().is_empty() => Ok(EngineConfig::default()),
        Some(s) => {
            let config: EngineConfig =
                serde_json::from_str(s).map_err(|e| format!("Invalid config JSON: {}", e))?;
            config.validate().map_err(|e| e.to_string())?;
            Ok(config)
        }
    }
}

fn parse_date(s: &str) -> Result<Day, String> {
    parse_day(s).map_err(|e| e.to_string())
}

/// Optional stay dates; an unparseable date counts as missing so the
/// resolver fails closed instead of the call throwing.
fn optional_date(s: Option<&str>) -> Option<Day> {
    s.and_then(|s| parse_day(s).ok())
}

fn parse_events_json(json: &str) -> Result<Vec<PointerEvent>, String> {
    let inputs: Vec<PointerEventInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid events JSON: {}", e))?;

    inputs
        .into_iter()
        .map(|input| {
            let day = || -> Result<Day, String> {
                let raw = input
                    .day
                    .as_deref()
                    .ok_or_else(|| format!("'{}' event needs a day", input.event))?;
                parse_date(raw)
            };
            match input.event.as_str() {
                "down" => Ok(PointerEvent::Down(day()?)),
                "enter" => Ok(PointerEvent::Enter(day()?)),
                "up" => Ok(PointerEvent::Up),
                "cancel" => Ok(PointerEvent::Cancel),
                other => Err(format!("Unknown pointer event: '{}'", other)),
            }
        })
        .collect()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn day_statuses_impl(feed_json: &str, today: &str) -> Result<String, String> {
    let feed = parse_feed(feed_json)?;
    let today = parse_date(today)?;
    let snapshot = RoomSnapshot::build(&feed, today, EngineConfig::default().horizon_days);

    let dto = DayStatusesDto {
        degraded: snapshot.is_degraded(),
        days: snapshot
            .store()
            .days()
            .map(|d| CalendarDayDto {
                date: format_day(d.date),
                status: d.status,
            })
            .collect(),
    };
    to_json(&dto)
}

fn can_book_impl(
    feed_json: &str,
    today: &str,
    check_in: Option<&str>,
    check_out: Option<&str>,
    single_beds: u32,
    double_beds: u32,
) -> Result<String, String> {
    let feed = parse_feed(feed_json)?;
    let today = parse_date(today)?;
    let snapshot = RoomSnapshot::build(&feed, today, EngineConfig::default().horizon_days);

    let verdict: Verdict = AvailabilityResolver::new(&snapshot).can_book(
        optional_date(check_in),
        optional_date(check_out),
        BedCount::new(single_beds, double_beds),
    );
    to_json(&verdict)
}

fn remaining_beds_impl(
    feed_json: &str,
    today: &str,
    check_in: Option<&str>,
    check_out: Option<&str>,
) -> Result<String, String> {
    let feed = parse_feed(feed_json)?;
    let today = parse_date(today)?;
    let snapshot = RoomSnapshot::build(&feed, today, EngineConfig::default().horizon_days);

    let stay = match (check_in, check_out) {
        (Some(a), Some(b)) => {
            Some(StayInterval::new(parse_date(a)?, parse_date(b)?).map_err(|e| e.to_string())?)
        }
        _ => None,
    };
    let remaining = AvailabilityResolver::new(&snapshot)
        .remaining_beds(stay.as_ref())
        .map_err(|e| e.to_string())?;
    to_json(&remaining)
}

fn apply_selection_impl(
    feed_json: &str,
    today: &str,
    config_json: Option<&str>,
    events_json: &str,
) -> Result<String, String> {
    let feed = parse_feed(feed_json)?;
    let today = parse_date(today)?;
    let config = parse_config(config_json)?;
    let events = parse_events_json(events_json)?;

    let mut calendar = RoomCalendar::with_today(&feed, config, today);
    let outcomes: Vec<CommitOutcomeDto> = events
        .into_iter()
        .filter_map(|event| calendar.handle(event))
        .map(|o| CommitOutcomeDto::from(&o))
        .collect();

    to_json(&SelectionResultDto {
        outcomes,
        unavailable: calendar.export_unavailable_iso(),
    })
}

fn export_unavailable_impl(feed_json: &str, today: &str) -> Result<String, String> {
    let feed = parse_feed(feed_json)?;
    let today = parse_date(today)?;
    let snapshot = RoomSnapshot::build(&feed, today, EngineConfig::default().horizon_days);
    to_json(&snapshot.store().export_unavailable_iso())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Per-day statuses for the horizon starting at `today`.
///
/// Returns `{degraded, days: [{date, status}]}`; `degraded` is true when the
/// feed lacked bookings or disabled dates.
#[wasm_bindgen(js_name = "dayStatuses")]
pub fn day_statuses(feed_json: &str, today: &str) -> Result<String, JsValue> {
    day_statuses_impl(feed_json, today).map_err(|e| JsValue::from_str(&e))
}

/// Bookability verdict for a stay, as `{verdict, reason?}`.
///
/// Bed counts are only consulted for shared rooms. Missing or unparseable
/// stay dates produce a `not_bookable` verdict rather than an error.
#[wasm_bindgen(js_name = "canBook")]
pub fn can_book(
    feed_json: &str,
    today: &str,
    check_in: Option<String>,
    check_out: Option<String>,
    single_beds: u32,
    double_beds: u32,
) -> Result<String, JsValue> {
    can_book_impl(
        feed_json,
        today,
        check_in.as_deref(),
        check_out.as_deref(),
        single_beds,
        double_beds,
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Remaining `{single, double}` beds of a shared room, for a stay or, without
/// dates, in total.
#[wasm_bindgen(js_name = "remainingBeds")]
pub fn remaining_beds(
    feed_json: &str,
    today: &str,
    check_in: Option<String>,
    check_out: Option<String>,
) -> Result<String, JsValue> {
    remaining_beds_impl(feed_json, today, check_in.as_deref(), check_out.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Replay pointer events (`[{event: "down"|"enter"|"up"|"cancel", day?}]`)
/// against the room calendar.
///
/// Returns `{outcomes: [{target, changed}], unavailable}` where `unavailable`
/// is the list to persist.
#[wasm_bindgen(js_name = "applySelection")]
pub fn apply_selection(
    feed_json: &str,
    today: &str,
    config_json: Option<String>,
    events_json: &str,
) -> Result<String, JsValue> {
    apply_selection_impl(feed_json, today, config_json.as_deref(), events_json)
        .map_err(|e| JsValue::from_str(&e))
}

/// Unavailable days of the horizon as ISO date strings.
#[wasm_bindgen(js_name = "exportUnavailable")]
pub fn export_unavailable(feed_json: &str, today: &str) -> Result<String, JsValue> {
    export_unavailable_impl(feed_json, today).map_err(|e| JsValue::from_str(&e))
}
