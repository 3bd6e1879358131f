use tracing::{debug, warn};

use super::Planner;
use crate::cascade::recalculate;
use crate::codec::{parse_duration, WallTime};
use crate::error::{Result, StateError, ValidationError};
use crate::model::{ListId, Routine, RoutineId};
use crate::notify::Notifier;
use crate::timer::Scheduler;

impl<S: Scheduler, N: Notifier> Planner<S, N> {
    /// Append a routine to `list_id`.
    ///
    /// On an empty list `start` (or the current time) becomes the chain's
    /// start. Otherwise the routine starts where the last one ends and
    /// `start` is ignored.
    pub fn add_routine(
        &mut self,
        list_id: ListId,
        name: impl Into<String>,
        duration_secs: u64,
        start: Option<WallTime>,
    ) -> Result<RoutineId> {
        let now = self.clock().now();
        let list = self.list_mut(list_id)?;
        let start = match list.routines.last() {
            Some(last) => last.end(),
            None => start.unwrap_or(now),
        };
        let routine = Routine::new(name, start, duration_secs);
        let id = routine.id();
        list.routines.push(routine);
        Ok(id)
    }

    /// Validate raw form input, then [`add_routine`](Self::add_routine).
    ///
    /// Rejected input is reported to the notifier and nothing is added.
    pub fn add_routine_from_input(
        &mut self,
        list_id: ListId,
        name: &str,
        duration: &str,
        start: Option<&str>,
    ) -> Result<RoutineId> {
        let parsed = validate_name(name)
            .and_then(|_| validate_duration(duration))
            .and_then(|secs| {
                let start = start
                    .filter(|s| !s.trim().is_empty())
                    .map(WallTime::parse)
                    .transpose()?;
                Ok((secs, start))
            });
        match parsed {
            Ok((secs, start)) => self.add_routine(list_id, name.trim(), secs, start),
            Err(err) => Err(self.reject(err)),
        }
    }

    pub fn rename_routine(
        &mut self,
        list_id: ListId,
        routine_id: RoutineId,
        name: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        if let Err(err) = validate_name(&name) {
            return Err(self.reject(err));
        }
        let list = self.list_mut(list_id)?;
        let routine = list
            .routines
            .iter_mut()
            .find(|r| r.id() == routine_id)
            .ok_or(StateError::RoutineNotFound {
                list: list_id,
                routine: routine_id,
            })?;
        routine.name = name;
        Ok(())
    }

    /// Change one routine's duration and re-chain everything after it.
    pub fn update_duration(
        &mut self,
        list_id: ListId,
        routine_id: RoutineId,
        duration_secs: u64,
    ) -> Result<()> {
        let index = self.routine_index(list_id, routine_id)?;
        let clock = self.clock.as_ref();
        let list = self
            .lists
            .iter_mut()
            .find(|l| l.id() == list_id)
            .ok_or(StateError::ListNotFound(list_id))?;
        list.routines[index].set_duration(duration_secs);
        recalculate(&mut list.routines, index, clock);
        self.invalidate_if_running(list_id);
        Ok(())
    }

    pub fn update_duration_from_input(
        &mut self,
        list_id: ListId,
        routine_id: RoutineId,
        duration: &str,
    ) -> Result<()> {
        match validate_duration(duration) {
            Ok(secs) => self.update_duration(list_id, routine_id, secs),
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Move the start of the whole chain.
    pub fn set_list_start(&mut self, list_id: ListId, start: WallTime) -> Result<()> {
        let clock = self.clock.as_ref();
        let list = self
            .lists
            .iter_mut()
            .find(|l| l.id() == list_id)
            .ok_or(StateError::ListNotFound(list_id))?;
        let Some(first) = list.routines.first_mut() else {
            return Err(StateError::EmptyList(list_id).into());
        };
        first.set_start(start);
        recalculate(&mut list.routines, 0, clock);
        self.invalidate_if_running(list_id);
        Ok(())
    }

    /// Remove one routine and close the gap it leaves.
    ///
    /// The timer keeps running only when the routine it is counting down is
    /// still at the same index.
    pub fn delete_routine(&mut self, list_id: ListId, routine_id: RoutineId) -> Result<()> {
        let index = self.routine_index(list_id, routine_id)?;
        let clock = self.clock.as_ref();
        let list = self
            .lists
            .iter_mut()
            .find(|l| l.id() == list_id)
            .ok_or(StateError::ListNotFound(list_id))?;
        list.routines.remove(index);
        recalculate(&mut list.routines, index.saturating_sub(1), clock);

        let stale = self
            .timer
            .active()
            .filter(|a| a.list_id == list_id)
            .is_some_and(|a| {
                list.routines.is_empty()
                    || a.routine_id == routine_id
                    || list.routines.get(a.routine_index).map(|r| r.id()) != Some(a.routine_id)
            });
        if stale {
            self.invalidate_if_running(list_id);
        }
        Ok(())
    }

    pub fn clear_routines(&mut self, list_id: ListId) -> Result<()> {
        self.list_mut(list_id)?.routines.clear();
        self.invalidate_if_running(list_id);
        Ok(())
    }

    /// Move a routine to `target_index` of `target_list`, which may be the
    /// list it came from. Both lists are re-chained from the top.
    ///
    /// Any timer running on either list is stopped.
    pub fn move_routine(
        &mut self,
        routine_id: RoutineId,
        source_list: ListId,
        target_list: ListId,
        target_index: usize,
    ) -> Result<()> {
        let from = self.routine_index(source_list, routine_id)?;
        let source = self.list_index(source_list)?;
        let target = self.list_index(target_list)?;

        let routine = self.lists[source].routines.remove(from);
        let routines = &mut self.lists[target].routines;
        let at = target_index.min(routines.len());
        debug!(routine = %routine_id, from, to = at, "moving routine");
        routines.insert(at, routine);

        let clock = self.clock.as_ref();
        recalculate(&mut self.lists[source].routines, 0, clock);
        if target != source {
            recalculate(&mut self.lists[target].routines, 0, clock);
        }

        self.invalidate_if_running(source_list);
        self.invalidate_if_running(target_list);
        Ok(())
    }

    fn routine_index(&self, list_id: ListId, routine_id: RoutineId) -> Result<usize, StateError> {
        let list = self.list(list_id).ok_or(StateError::ListNotFound(list_id))?;
        list.position(routine_id).ok_or_else(|| {
            warn!(list = %list_id, routine = %routine_id, "unknown routine");
            StateError::RoutineNotFound {
                list: list_id,
                routine: routine_id,
            }
        })
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

fn validate_duration(input: &str) -> Result<u64, ValidationError> {
    let secs = parse_duration(input)?;
    if secs == 0 {
        return Err(ValidationError::InvalidValue {
            field: "duration".into(),
            message: "must be greater than zero".into(),
        });
    }
    Ok(secs)
}
