//! Start/end time cascade over a chain of routines.

use tracing::warn;

use crate::codec::{Clock, WallTime};
use crate::model::Routine;

/// Re-chain `routines` from `from_index` onward.
///
/// Index 0 keeps its own start. Any other `from_index` takes its start from
/// the end of its predecessor, and every later routine starts where the one
/// before it ends. Routines before `from_index` are left alone.
pub fn recalculate(routines: &mut [Routine], from_index: usize, clock: &dyn Clock) {
    if from_index >= routines.len() {
        return;
    }

    let mut start = if from_index == 0 {
        routines[0].start()
    } else {
        predecessor_end(routines, from_index, clock)
    };

    for routine in &mut routines[from_index..] {
        routine.set_start(start);
        start = routine.end();
    }
}

/// End of the routine before `index`. Without one, the chain restarts at the
/// clock's current time; `recalculate` only asks for indices that have a
/// predecessor.
fn predecessor_end(routines: &[Routine], index: usize, clock: &dyn Clock) -> WallTime {
    match index.checked_sub(1).and_then(|i| routines.get(i)) {
        Some(prev) => prev.end(),
        None => {
            let now = clock.now();
            warn!(index, fallback = %now, "cascade predecessor missing, using current time");
            now
        }
    }
}
