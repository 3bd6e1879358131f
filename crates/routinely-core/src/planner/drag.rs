//! In-flight drag gesture.
//!
//! The host owns a [`DragContext`], records what was picked up, and hands
//! it back on drop together with the resolved target index.

use serde::{Deserialize, Serialize};

use super::Planner;
use crate::error::Result;
use crate::model::{ListId, RoutineId};
use crate::notify::Notifier;
use crate::timer::Scheduler;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dragging", rename_all = "snake_case")]
pub enum DragContext {
    #[default]
    Idle,
    Routine {
        routine_id: RoutineId,
        source_list: ListId,
    },
    List {
        source_index: usize,
    },
}

impl DragContext {
    pub fn begin_routine(&mut self, routine_id: RoutineId, source_list: ListId) {
        *self = DragContext::Routine {
            routine_id,
            source_list,
        };
    }

    pub fn begin_list(&mut self, source_index: usize) {
        *self = DragContext::List { source_index };
    }

    pub fn cancel(&mut self) {
        *self = DragContext::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self, DragContext::Idle)
    }
}

impl<S: Scheduler, N: Notifier> Planner<S, N> {
    /// Finish a routine drag over `target_list` at `target_index`.
    ///
    /// Returns `Ok(false)` when no routine was being dragged. The context is
    /// reset whether or not the move succeeds.
    pub fn drop_routine(
        &mut self,
        drag: &mut DragContext,
        target_list: ListId,
        target_index: usize,
    ) -> Result<bool> {
        let DragContext::Routine {
            routine_id,
            source_list,
        } = *drag
        else {
            return Ok(false);
        };
        drag.cancel();
        self.move_routine(routine_id, source_list, target_list, target_index)?;
        Ok(true)
    }

    /// Finish a list drag at `target_index`.
    pub fn drop_list(&mut self, drag: &mut DragContext, target_index: usize) -> Result<bool> {
        let DragContext::List { source_index } = *drag else {
            return Ok(false);
        };
        drag.cancel();
        self.move_list(source_index, target_index)?;
        Ok(true)
    }
}
