//! Per-day status of one room across a rolling horizon.
//!
//! The store is the unit an operator edits. `Booked` is derived from the
//! bookings at build time and can never be written; days before `today` are
//! read-only. Writes to either are skipped silently.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MAX_HORIZON_DAYS;
use crate::index::{Exclusion, IntervalIndex};
use crate::model::{CalendarDay, DateRange, Day, DayStatus};
use crate::normalizer::format_day;

/// How a committed selection changes the days it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Flip the anchor day and apply that same status to the rest of the selection.
    #[default]
    Toggle,
    /// Mark every selected day unavailable.
    SetUnavailable,
    /// Mark every selected day available.
    SetAvailable,
}

/// Result of applying a status change to a set of days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitOutcome {
    pub target: DayStatus,
    /// Days whose status actually changed, ascending.
    pub changed: Vec<Day>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStatusStore {
    today: Day,
    /// One entry per horizon day; `days[0]` is `today`.
    days: Vec<CalendarDay>,
}

impl DayStatusStore {
    /// Derive statuses for `today ..= today + horizon_days` from `index`.
    ///
    /// The horizon is capped at [`MAX_HORIZON_DAYS`] and stops early at the
    /// last representable date.
    pub fn build(index: &IntervalIndex, today: Day, horizon_days: u32) -> Self {
        let horizon_days = horizon_days.min(MAX_HORIZON_DAYS);
        let days: Vec<CalendarDay> = (0..=i64::from(horizon_days))
            .map_while(|offset| today.checked_add_signed(Duration::days(offset)))
            .map(|date| {
                let status = match index.exclusion(date) {
                    Some(Exclusion::Booked) => DayStatus::Booked,
                    Some(Exclusion::Disabled) => DayStatus::Unavailable,
                    None => DayStatus::Available,
                };
                CalendarDay { date, status }
            })
            .collect();

        debug!(%today, horizon_days, "built day status store");
        Self { today, days }
    }

    /// Re-derive against a fresh index, keeping this store's operator edits on
    /// every day the new index does not book.
    pub fn rebase(&self, index: &IntervalIndex) -> Self {
        let mut next = Self::build(index, self.today, self.horizon_days());
        for (fresh, current) in next.days.iter_mut().zip(&self.days) {
            if fresh.status != DayStatus::Booked && current.status != DayStatus::Booked {
                fresh.status = current.status;
            }
        }
        next
    }

    pub fn today(&self) -> Day {
        self.today
    }

    pub fn horizon_days(&self) -> u32 {
        u32::try_from(self.days.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    pub fn horizon(&self) -> DateRange {
        let last = self.days.last().map(|d| d.date).unwrap_or(self.today);
        DateRange::between(self.today, last)
    }

    /// Status of `day`, or `None` outside the horizon (including past days).
    pub fn get(&self, day: Day) -> Option<DayStatus> {
        self.position(day).map(|p| self.days[p].status)
    }

    pub fn is_past(&self, day: Day) -> bool {
        day < self.today
    }

    /// True for in-horizon, non-past days that are not booked.
    pub fn is_editable(&self, day: Day) -> bool {
        matches!(
            self.get(day),
            Some(DayStatus::Available | DayStatus::Unavailable)
        )
    }

    /// The per-day stream for rendering a calendar grid.
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.days.iter()
    }

    /// Set every editable day in `range` to `target`.
    pub fn set_range(&mut self, range: &DateRange, target: DayStatus) -> CommitOutcome {
        let days: Vec<Day> = range.days().collect();
        self.set_days(&days, target)
    }

    /// Flip the status of `range.start` and apply the result across `range`.
    /// Returns `None` when the anchor is booked, past or outside the horizon.
    pub fn toggle_range(&mut self, range: &DateRange) -> Option<CommitOutcome> {
        let days: Vec<Day> = range.days().collect();
        self.toggle_days(range.start, &days)
    }

    /// Set each editable day in `days` to `target`. `Booked` is never written.
    pub fn set_days(&mut self, days: &[Day], target: DayStatus) -> CommitOutcome {
        let mut changed = Vec::new();
        if target != DayStatus::Booked {
            for &day in days {
                let Some(pos) = self.position(day) else {
                    continue;
                };
                let entry = &mut self.days[pos];
                if entry.status != DayStatus::Booked && entry.status != target {
                    entry.status = target;
                    changed.push(day);
                }
            }
        }
        changed.sort();
        changed.dedup();
        debug!(?target, changed = changed.len(), "applied day statuses");
        CommitOutcome { target, changed }
    }

    /// Toggle-and-propagate: the opposite of the anchor's status goes to every day.
    pub fn toggle_days(&mut self, anchor: Day, days: &[Day]) -> Option<CommitOutcome> {
        let target = self.get(anchor)?.toggled()?;
        Some(self.set_days(days, target))
    }

    /// Apply `days` under `policy`, reading the toggle target from `anchor`.
    pub fn commit(
        &mut self,
        policy: CommitPolicy,
        anchor: Day,
        days: &[Day],
    ) -> Option<CommitOutcome> {
        match policy {
            CommitPolicy::Toggle => self.toggle_days(anchor, days),
            CommitPolicy::SetUnavailable => Some(self.set_days(days, DayStatus::Unavailable)),
            CommitPolicy::SetAvailable => Some(self.set_days(days, DayStatus::Available)),
        }
    }

    /// Every unavailable day, ascending.
    pub fn export_unavailable(&self) -> Vec<Day> {
        self.days
            .iter()
            .filter(|d| d.status == DayStatus::Unavailable)
            .map(|d| d.date)
            .collect()
    }

    /// [`export_unavailable`](Self::export_unavailable) as `YYYY-MM-DD` strings.
    pub fn export_unavailable_iso(&self) -> Vec<String> {
        self.export_unavailable().into_iter().map(format_day).collect()
    }

    fn position(&self, day: Day) -> Option<usize> {
        let offset = (day - self.today).num_days();
        usize::try_from(offset).ok().filter(|&p| p < self.days.len())
    }
}
