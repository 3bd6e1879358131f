//! Routines and the lists that chain them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::WallTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutineId(Uuid);

impl RoutineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoutineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(Uuid);

impl ListId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single named, timed activity.
///
/// `end` is derived from `start + duration_secs`; it is only ever written
/// through [`Routine::set_start`] and [`Routine::set_duration`]. Routines
/// serialize for display but are never read back; build them with
/// [`Routine::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Routine {
    id: RoutineId,
    pub name: String,
    start: WallTime,
    duration_secs: u64,
    end: WallTime,
}

impl Routine {
    pub fn new(name: impl Into<String>, start: WallTime, duration_secs: u64) -> Self {
        Self {
            id: RoutineId::new(),
            name: name.into(),
            start,
            duration_secs,
            end: start.plus_secs(duration_secs),
        }
    }

    pub fn id(&self) -> RoutineId {
        self.id
    }

    pub fn start(&self) -> WallTime {
        self.start
    }

    pub fn end(&self) -> WallTime {
        self.end
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn set_start(&mut self, start: WallTime) {
        self.start = start;
        self.end = start.plus_secs(self.duration_secs);
    }

    pub fn set_duration(&mut self, duration_secs: u64) {
        self.duration_secs = duration_secs;
        self.end = self.start.plus_secs(duration_secs);
    }
}

/// An ordered chain of routines sharing a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutineList {
    id: ListId,
    pub title: String,
    pub(crate) routines: Vec<Routine>,
}

impl RoutineList {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ListId::new(),
            title: title.into(),
            routines: Vec::new(),
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn routines(&self) -> &[Routine] {
        &self.routines
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    pub fn position(&self, routine: RoutineId) -> Option<usize> {
        self.routines.iter().position(|r| r.id() == routine)
    }

    pub fn get(&self, routine: RoutineId) -> Option<&Routine> {
        self.routines.iter().find(|r| r.id() == routine)
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.routines
            .iter()
            .fold(0, |acc: u64, r| acc.saturating_add(r.duration_secs()))
    }

    /// Seconds of all routines before `index`.
    pub fn cumulative_secs(&self, index: usize) -> u64 {
        self.routines
            .iter()
            .take(index)
            .fold(0, |acc: u64, r| acc.saturating_add(r.duration_secs()))
    }

    /// True when every routine starts where its predecessor ends.
    pub fn is_chained(&self) -> bool {
        self.routines.windows(2).all(|w| w[1].start() == w[0].end())
    }
}
