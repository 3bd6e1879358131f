//! Active timer state machine.
//!
//! Counts down one routine at a time through a single list. The engine holds
//! no reference to the list; the caller passes the current list on every
//! call, so edits are always seen as they are.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running(list, index, remaining) -> ... -> Idle
//! ```
//!
//! Each tick takes one second off `remaining`. The tick that would bring it
//! to zero completes the routine instead and moves on to the next one, or
//! back to `Idle` after the last.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::format_countdown;
use crate::events::{Event, StopReason};
use crate::model::{ListId, RoutineId, RoutineList};

/// The one running countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTimer {
    pub list_id: ListId,
    pub routine_id: RoutineId,
    pub routine_index: usize,
    pub remaining_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TimerState {
    #[default]
    Idle,
    Running(ActiveTimer),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerEngine {
    state: TimerState,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn active(&self) -> Option<&ActiveTimer> {
        match &self.state {
            TimerState::Running(active) => Some(active),
            TimerState::Idle => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active().is_some()
    }

    pub fn is_running_list(&self, list_id: ListId) -> bool {
        self.active().is_some_and(|a| a.list_id == list_id)
    }

    /// 0.0 .. 100.0 progress through the running list.
    pub fn list_progress_pct(&self, list: &RoutineList) -> f64 {
        let Some(active) = self.active() else {
            return 0.0;
        };
        let total = list.total_duration_secs() as f64;
        if total == 0.0 {
            return 0.0;
        }
        let current = list
            .routines()
            .get(active.routine_index)
            .map(|r| r.duration_secs())
            .unwrap_or(0);
        let elapsed = list
            .cumulative_secs(active.routine_index)
            .saturating_add(current.saturating_sub(active.remaining_secs));
        (elapsed as f64 / total * 100.0).min(100.0)
    }

    /// Build a full state snapshot event. `list` should be the running list.
    pub fn snapshot(&self, list: Option<&RoutineList>) -> Event {
        let active = self.active();
        let remaining_secs = active.map(|a| a.remaining_secs).unwrap_or(0);
        let routine_name = active.and_then(|a| {
            list.and_then(|l| l.routines().get(a.routine_index))
                .map(|r| r.name.clone())
        });
        Event::StateSnapshot {
            running: active.is_some(),
            list_id: active.map(|a| a.list_id),
            list_title: active.and(list).map(|l| l.title.clone()),
            routine_index: active.map(|a| a.routine_index),
            routine_name,
            remaining_secs,
            countdown: format_countdown(remaining_secs),
            list_progress_pct: list.map(|l| self.list_progress_pct(l)).unwrap_or(0.0),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down `list` from its first routine.
    ///
    /// Returns `None` for an empty list and leaves the current state alone.
    /// Any other running list is replaced outright.
    pub fn start(&mut self, list: &RoutineList) -> Option<Event> {
        let first = list.routines().first()?;
        debug!(list = %list.id(), routine = %first.id(), "timer started");
        self.state = TimerState::Running(ActiveTimer {
            list_id: list.id(),
            routine_id: first.id(),
            routine_index: 0,
            remaining_secs: first.duration_secs(),
        });
        Some(Event::TimerStarted {
            list_id: list.id(),
            routine_id: first.id(),
            routine_index: 0,
            duration_secs: first.duration_secs(),
            at: Utc::now(),
        })
    }

    pub fn stop(&mut self, reason: StopReason) -> Option<Event> {
        let TimerState::Running(active) = std::mem::take(&mut self.state) else {
            return None;
        };
        debug!(list = %active.list_id, ?reason, "timer stopped");
        Some(Event::TimerStopped {
            list_id: active.list_id,
            reason,
            at: Utc::now(),
        })
    }

    /// Advance by one second.
    ///
    /// `list` must be the running list. Returns the transitions this tick
    /// caused, in order; an ordinary countdown second returns nothing.
    pub fn tick(&mut self, list: &RoutineList) -> Vec<Event> {
        let TimerState::Running(active) = &mut self.state else {
            return Vec::new();
        };

        if active.list_id != list.id() {
            warn!(running = %active.list_id, given = %list.id(), "tick for a list not running");
            return Vec::new();
        }

        if active.remaining_secs > 1 {
            active.remaining_secs -= 1;
            return Vec::new();
        }

        let index = active.routine_index;
        let Some(done) = list.routines().get(index) else {
            warn!(list = %list.id(), index, "running routine vanished from its list");
            return self.stop(StopReason::Invalidated).into_iter().collect();
        };

        let mut events = vec![Event::RoutineCompleted {
            list_id: list.id(),
            routine_id: done.id(),
            routine_index: index,
            name: done.name.clone(),
            at: Utc::now(),
        }];

        match list.routines().get(index + 1) {
            Some(next) => {
                *active = ActiveTimer {
                    list_id: list.id(),
                    routine_id: next.id(),
                    routine_index: index + 1,
                    remaining_secs: next.duration_secs(),
                };
                events.push(Event::RoutineAdvanced {
                    list_id: list.id(),
                    routine_id: next.id(),
                    routine_index: index + 1,
                    duration_secs: next.duration_secs(),
                    at: Utc::now(),
                });
            }
            None => {
                self.state = TimerState::Idle;
                events.push(Event::ListCompleted {
                    list_id: list.id(),
                    title: list.title.clone(),
                    at: Utc::now(),
                });
            }
        }
        events
    }
}
