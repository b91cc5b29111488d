//! Drag selection over the day calendar.
//!
//! A press on an editable day starts a session anchored on that day; moving
//! over other days recomputes the span between anchor and pointer in either
//! direction; releasing commits the span to the [`DayStatusStore`]. Booked and
//! past days inside the span are left out of the committed set without
//! breaking it, so the days on both sides remain selected.

use std::collections::HashMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::model::{DateRange, Day, DayStatus};
use crate::store::{CommitOutcome, CommitPolicy, DayStatusStore};

/// A pointer event delivered by the calendar surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "day", rename_all = "snake_case")]
pub enum PointerEvent {
    Down(Day),
    Enter(Day),
    Up,
    Cancel,
}

/// What the active session will do on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Toggle,
    SetStatus(DayStatus),
}

impl From<CommitPolicy> for SelectionMode {
    fn from(policy: CommitPolicy) -> Self {
        match policy {
            CommitPolicy::Toggle => SelectionMode::Toggle,
            CommitPolicy::SetUnavailable => SelectionMode::SetStatus(DayStatus::Unavailable),
            CommitPolicy::SetAvailable => SelectionMode::SetStatus(DayStatus::Available),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSession {
    anchor: Day,
    mode: SelectionMode,
    /// Selected days in drag order, starting at the anchor.
    current: Vec<Day>,
}

impl SelectionSession {
    pub fn anchor(&self) -> Day {
        self.anchor
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn days(&self) -> &[Day] {
        &self.current
    }

    /// Smallest range covering the selected days.
    pub fn bounds(&self) -> DateRange {
        let first = self.current.iter().min().copied().unwrap_or(self.anchor);
        let last = self.current.iter().max().copied().unwrap_or(self.anchor);
        DateRange::between(first, last)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selecting(SelectionSession),
}

/// Optimistic statuses shown over the store while a selection is pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusOverlay {
    pending: HashMap<Day, DayStatus>,
}

impl StatusOverlay {
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    fn show(&mut self, days: &[Day], target: DayStatus) {
        self.pending.clear();
        self.pending.extend(days.iter().map(|&d| (d, target)));
    }

    /// Status to display for `day`: the pending status while the store still
    /// allows editing that day, the store's status otherwise.
    pub fn view(&self, store: &DayStatusStore, day: Day) -> Option<DayStatus> {
        match self.pending.get(&day) {
            Some(&pending) if store.is_editable(day) => Some(pending),
            _ => store.get(day),
        }
    }

    /// Drop pending entries the store no longer lets anyone edit.
    pub fn reconcile(&mut self, store: &DayStatusStore) {
        self.pending.retain(|&day, _| store.is_editable(day));
    }
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    policy: CommitPolicy,
    instant_feedback: bool,
    state: SelectionState,
    overlay: StatusOverlay,
}

impl SelectionController {
    pub fn new(policy: CommitPolicy, instant_feedback: bool) -> Self {
        Self {
            policy,
            instant_feedback,
            state: SelectionState::Idle,
            overlay: StatusOverlay::default(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.commit_policy, config.instant_feedback)
    }

    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    /// Change the policy for sessions started from now on. A session already
    /// in progress keeps the mode it was started with.
    pub fn set_policy(&mut self, policy: CommitPolicy) {
        self.policy = policy;
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn session(&self) -> Option<&SelectionSession> {
        match &self.state {
            SelectionState::Selecting(session) => Some(session),
            SelectionState::Idle => None,
        }
    }

    pub fn is_selecting(&self) -> bool {
        self.session().is_some()
    }

    pub fn overlay(&self) -> &StatusOverlay {
        &self.overlay
    }

    /// Status to render for `day`, including any pending selection preview.
    pub fn view(&self, store: &DayStatusStore, day: Day) -> Option<DayStatus> {
        self.overlay.view(store, day)
    }

    /// Feed one pointer event. Returns the commit outcome on a committing release.
    pub fn handle(
        &mut self,
        store: &mut DayStatusStore,
        event: PointerEvent,
    ) -> Option<CommitOutcome> {
        match event {
            PointerEvent::Down(day) => {
                self.pointer_down(store, day);
                None
            }
            PointerEvent::Enter(day) => {
                self.pointer_enter(store, day);
                None
            }
            PointerEvent::Up => self.pointer_up(store),
            PointerEvent::Cancel => {
                self.cancel();
                None
            }
        }
    }

    /// Start a session on `day`. Returns false if the day is not editable.
    ///
    /// A press during an active session discards that session uncommitted.
    pub fn pointer_down(&mut self, store: &DayStatusStore, day: Day) -> bool {
        if !store.is_editable(day) {
            return false;
        }
        if let SelectionState::Selecting(prior) = &self.state {
            debug!(anchor = %prior.anchor, "discarding uncommitted selection");
        }

        self.state = SelectionState::Selecting(SelectionSession {
            anchor: day,
            mode: self.policy.into(),
            current: vec![day],
        });
        self.refresh_preview(store);
        true
    }

    /// Extend the active session to `day`. Ignored while idle or over a day
    /// that cannot be edited.
    pub fn pointer_enter(&mut self, store: &DayStatusStore, day: Day) -> bool {
        let SelectionState::Selecting(session) = &mut self.state else {
            return false;
        };
        if !store.is_editable(day) {
            return false;
        }

        session.current = span_between(session.anchor, day)
            .into_iter()
            .filter(|&d| store.is_editable(d))
            .collect();
        self.refresh_preview(store);
        true
    }

    /// Commit the active session under the mode it was started with and
    /// return to idle. A release with no matching press does nothing.
    pub fn pointer_up(&mut self, store: &mut DayStatusStore) -> Option<CommitOutcome> {
        let SelectionState::Selecting(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        self.overlay.clear();

        let outcome = match session.mode {
            SelectionMode::Toggle => store.toggle_days(session.anchor, &session.current),
            SelectionMode::SetStatus(target) => Some(store.set_days(&session.current, target)),
        };
        debug!(
            anchor = %session.anchor,
            selected = session.current.len(),
            changed = outcome.as_ref().map_or(0, |o| o.changed.len()),
            "committed selection"
        );
        outcome
    }

    /// Abandon the active session without committing. Returns false while idle.
    pub fn cancel(&mut self) -> bool {
        self.overlay.clear();
        matches!(std::mem::take(&mut self.state), SelectionState::Selecting(_))
    }

    /// Bring the session and preview in line with a replaced store. A session
    /// whose anchor became uneditable is dropped.
    pub fn reconcile(&mut self, store: &DayStatusStore) {
        let anchor_lost = match &mut self.state {
            SelectionState::Selecting(session) => {
                session.current.retain(|&d| store.is_editable(d));
                !store.is_editable(session.anchor)
            }
            SelectionState::Idle => false,
        };
        if anchor_lost {
            self.cancel();
        } else {
            self.overlay.reconcile(store);
            self.refresh_preview(store);
        }
    }

    fn refresh_preview(&mut self, store: &DayStatusStore) {
        if !self.instant_feedback {
            return;
        }
        let SelectionState::Selecting(session) = &self.state else {
            self.overlay.clear();
            return;
        };
        let target = match session.mode {
            SelectionMode::Toggle => store.get(session.anchor).and_then(DayStatus::toggled),
            SelectionMode::SetStatus(status) => Some(status),
        };
        match target {
            Some(target) => self.overlay.show(&session.current, target),
            None => self.overlay.clear(),
        }
    }
}

/// Every day from `anchor` to `target` inclusive, stepping one day at a time
/// toward `target`. Works in both directions.
pub fn span_between(anchor: Day, target: Day) -> Vec<Day> {
    let step = if target < anchor {
        Duration::days(-1)
    } else {
        Duration::days(1)
    };
    let len = (target - anchor).num_days().unsigned_abs() as usize + 1;
    std::iter::successors(Some(anchor), |&d| Some(d + step))
        .take(len)
        .collect()
}
