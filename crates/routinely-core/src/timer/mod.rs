mod engine;
mod scheduler;

pub use engine::{ActiveTimer, TimerEngine, TimerState};
pub use scheduler::{ManualScheduler, Scheduler, TickHandle};
