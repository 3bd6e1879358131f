//! Tick source abstraction.
//!
//! The planner never sleeps or spawns. It asks a [`Scheduler`] to arm a
//! periodic tick and gets back a [`TickHandle`]; the host delivers each tick
//! by calling `Planner::tick(handle)`. Ticks carrying a cancelled handle are
//! dropped by the planner.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

pub trait Scheduler {
    /// Arm a periodic tick every `interval`.
    fn schedule(&mut self, interval: Duration) -> TickHandle;

    /// Disarm a tick source. Cancelling an unknown handle is a no-op.
    fn cancel(&mut self, handle: TickHandle);
}

/// A scheduler driven by hand. It only records what was armed and
/// cancelled; the caller fires ticks itself.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    next_id: u64,
    armed: Vec<(TickHandle, Duration)>,
    cancelled: Vec<TickHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently armed handle that is still live.
    pub fn armed(&self) -> Option<TickHandle> {
        self.armed.last().map(|(h, _)| *h)
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    pub fn interval(&self, handle: TickHandle) -> Option<Duration> {
        self.armed
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, i)| *i)
    }

    pub fn cancelled(&self) -> &[TickHandle] {
        &self.cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, interval: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.armed.push((handle, interval));
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        let before = self.armed.len();
        self.armed.retain(|(h, _)| *h != handle);
        if self.armed.len() != before {
            self.cancelled.push(handle);
        }
    }
}
