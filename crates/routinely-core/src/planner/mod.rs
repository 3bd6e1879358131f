//! The planner: list collection, mutation layer and timer control.
//!
//! A [`Planner`] owns every list and the single active timer. All calls are
//! synchronous; a mutation that changes the timing or identity of the
//! running list stops the timer and disarms its tick source before
//! returning.

mod drag;
mod routines;

pub use drag::DragContext;

use std::time::Duration;

use tracing::{debug, warn};

use crate::codec::{Clock, SystemClock};
use crate::error::{Result, StateError, ValidationError};
use crate::events::{Event, StopReason};
use crate::model::{ListId, RoutineList};
use crate::notify::{Notification, Notifier};
use crate::timer::{ActiveTimer, Scheduler, TickHandle, TimerEngine, TimerState};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

pub struct Planner<S: Scheduler, N: Notifier> {
    lists: Vec<RoutineList>,
    timer: TimerEngine,
    tick: Option<TickHandle>,
    tick_interval: Duration,
    scheduler: S,
    notifier: N,
    clock: Box<dyn Clock>,
}

impl<S: Scheduler, N: Notifier> Planner<S, N> {
    pub fn new(scheduler: S, notifier: N) -> Self {
        Self {
            lists: Vec::new(),
            timer: TimerEngine::new(),
            tick: None,
            tick_interval: DEFAULT_TICK_INTERVAL,
            scheduler,
            notifier,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn lists(&self) -> &[RoutineList] {
        &self.lists
    }

    pub fn list(&self, id: ListId) -> Option<&RoutineList> {
        self.lists.iter().find(|l| l.id() == id)
    }

    pub fn list_by_title(&self, title: &str) -> Option<&RoutineList> {
        self.lists.iter().find(|l| l.title == title)
    }

    pub fn timer_state(&self) -> &TimerState {
        self.timer.state()
    }

    pub fn active(&self) -> Option<&ActiveTimer> {
        self.timer.active()
    }

    pub fn is_running(&self, list_id: ListId) -> bool {
        self.timer.is_running_list(list_id)
    }

    /// Handle of the tick source currently armed, if any.
    pub fn tick_handle(&self) -> Option<TickHandle> {
        self.tick
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn snapshot(&self) -> Event {
        let list = self.active().and_then(|a| self.list(a.list_id));
        self.timer.snapshot(list)
    }

    // ── Lists ────────────────────────────────────────────────────────

    pub fn add_list(&mut self, title: impl Into<String>) -> Result<ListId> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(self.reject(ValidationError::EmptyName));
        }
        let list = RoutineList::new(title);
        let id = list.id();
        self.lists.push(list);
        Ok(id)
    }

    pub fn rename_list(&mut self, id: ListId, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(self.reject(ValidationError::EmptyName));
        }
        self.list_mut(id)?.title = title;
        Ok(())
    }

    /// Remove a list and all its routines.
    pub fn delete_list(&mut self, id: ListId) -> Result<()> {
        let index = self.list_index(id)?;
        self.invalidate_if_running(id);
        self.lists.remove(index);
        Ok(())
    }

    /// Reorder the list collection.
    ///
    /// `target_index` is a drop position in the current order, so it shifts
    /// down by one when the list is moved past its own slot.
    pub fn move_list(&mut self, source_index: usize, target_index: usize) -> Result<()> {
        let len = self.lists.len();
        if source_index >= len {
            return Err(StateError::IndexOutOfBounds {
                collection: "lists".into(),
                index: source_index,
                len,
            }
            .into());
        }
        let target = if source_index < target_index {
            target_index - 1
        } else {
            target_index
        };
        let list = self.lists.remove(source_index);
        let target = target.min(self.lists.len());
        self.lists.insert(target, list);
        Ok(())
    }

    // ── Timer control ────────────────────────────────────────────────

    /// Start counting down `id` from its first routine.
    ///
    /// An empty list only produces a notification. Starting a list that is
    /// already running does nothing. Starting while another list runs
    /// replaces that timer without a stop notification.
    pub fn start_list(&mut self, id: ListId) -> Result<Vec<Event>> {
        let index = self.list_index(id)?;
        let mut events = Vec::new();

        if self.lists[index].is_empty() {
            let list = self.lists[index].title.clone();
            self.notifier.notify(&Notification::EmptyList { list });
            return Ok(events);
        }
        if self.timer.is_running_list(id) {
            return Ok(events);
        }

        self.disarm();
        if let Some(previous) = self.active().map(|a| a.list_id) {
            events.push(Event::TimerReplaced {
                previous_list_id: previous,
                list_id: id,
                at: chrono::Utc::now(),
            });
        }

        if let Some(started) = self.timer.start(&self.lists[index]) {
            self.tick = Some(self.scheduler.schedule(self.tick_interval));
            events.push(started);
        }
        Ok(events)
    }

    /// Stop `id` if it is the running list.
    pub fn stop_list(&mut self, id: ListId) -> Option<Event> {
        if !self.timer.is_running_list(id) {
            return None;
        }
        self.stop_timer(StopReason::Stopped)
    }

    /// Stop whatever list is running.
    pub fn stop(&mut self) -> Option<Event> {
        self.stop_timer(StopReason::Stopped)
    }

    /// Stop `id` if it is running, otherwise start it.
    pub fn toggle_list(&mut self, id: ListId) -> Result<Vec<Event>> {
        if self.timer.is_running_list(id) {
            return Ok(self.stop_list(id).into_iter().collect());
        }
        self.start_list(id)
    }

    /// Deliver one tick from the scheduler.
    ///
    /// Ticks from a handle other than the armed one are stale and ignored.
    pub fn tick(&mut self, handle: TickHandle) -> Vec<Event> {
        if self.tick != Some(handle) {
            debug!(handle = handle.id(), "ignoring tick from a disarmed source");
            return Vec::new();
        }
        let Some(list_id) = self.active().map(|a| a.list_id) else {
            self.disarm();
            return Vec::new();
        };
        let Some(index) = self.lists.iter().position(|l| l.id() == list_id) else {
            warn!(list = %list_id, "running list is gone, stopping timer");
            return self.stop_timer(StopReason::Invalidated).into_iter().collect();
        };

        let events = self.timer.tick(&self.lists[index]);
        for event in &events {
            match event {
                Event::RoutineCompleted { name, .. } => {
                    self.notifier
                        .notify(&Notification::RoutineComplete { name: name.clone() });
                }
                Event::ListCompleted { title, .. } => {
                    self.notifier
                        .notify(&Notification::AllComplete { list: title.clone() });
                }
                Event::TimerStopped { .. } => {
                    let list = self.lists[index].title.clone();
                    self.notifier.notify(&Notification::TimerInvalidated { list });
                }
                _ => {}
            }
        }
        if !self.timer.is_running() {
            self.disarm();
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn list_index(&self, id: ListId) -> Result<usize, StateError> {
        self.lists
            .iter()
            .position(|l| l.id() == id)
            .ok_or_else(|| {
                warn!(list = %id, "unknown list");
                StateError::ListNotFound(id)
            })
    }

    fn list_mut(&mut self, id: ListId) -> Result<&mut RoutineList, StateError> {
        let index = self.list_index(id)?;
        Ok(&mut self.lists[index])
    }

    fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn stop_timer(&mut self, reason: StopReason) -> Option<Event> {
        self.disarm();
        let event = self.timer.stop(reason)?;
        if let Event::TimerStopped { list_id, .. } = &event {
            let list = self
                .list(*list_id)
                .map(|l| l.title.clone())
                .unwrap_or_else(|| list_id.to_string());
            let notification = match reason {
                StopReason::Stopped => Notification::TimerStopped { list },
                StopReason::Invalidated => Notification::TimerInvalidated { list },
            };
            self.notifier.notify(&notification);
        }
        Some(event)
    }

    fn invalidate_if_running(&mut self, id: ListId) -> Option<Event> {
        if self.timer.is_running_list(id) {
            self.stop_timer(StopReason::Invalidated)
        } else {
            None
        }
    }

    /// Report a validation failure to the notifier and hand it back.
    fn reject(&mut self, err: ValidationError) -> crate::error::CoreError {
        self.notifier.notify(&Notification::InvalidInput {
            message: err.to_string(),
        });
        err.into()
    }
}
