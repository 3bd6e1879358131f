use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ListId, RoutineId};

/// Why a running timer was torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The user stopped the list.
    Stopped,
    /// A mutation changed timing or identity of the running list.
    Invalidated,
}

/// Every timer transition produces an Event.
/// The host renders them; notifications are derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        list_id: ListId,
        routine_id: RoutineId,
        routine_index: usize,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// The running list was replaced by another one without a stop.
    TimerReplaced {
        previous_list_id: ListId,
        list_id: ListId,
        at: DateTime<Utc>,
    },
    TimerStopped {
        list_id: ListId,
        reason: StopReason,
        at: DateTime<Utc>,
    },
    RoutineCompleted {
        list_id: ListId,
        routine_id: RoutineId,
        routine_index: usize,
        name: String,
        at: DateTime<Utc>,
    },
    RoutineAdvanced {
        list_id: ListId,
        routine_id: RoutineId,
        routine_index: usize,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    ListCompleted {
        list_id: ListId,
        title: String,
        at: DateTime<Utc>,
    },
    /// Full view of the active timer, for hosts that poll.
    StateSnapshot {
        running: bool,
        list_id: Option<ListId>,
        list_title: Option<String>,
        routine_index: Option<usize>,
        routine_name: Option<String>,
        remaining_secs: u64,
        countdown: String,
        list_progress_pct: f64,
        at: DateTime<Utc>,
    },
}
