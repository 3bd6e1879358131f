//! # Routinely Core Library
//!
//! Business logic for a planner of sequential timed routines organised into
//! ordered lists. The library is host-agnostic: rendering, drag gestures,
//! speech and sound live in the host and talk to the core through a few
//! small seams.
//!
//! ## Architecture
//!
//! - **Codec**: duration and wall-clock parsing/formatting
//! - **Cascade**: keeps each routine starting where the previous one ends
//! - **Planner**: list collection and the mutations on it
//! - **Timer Engine**: a tick-driven state machine that counts down one
//!   list at a time; the caller delivers ticks from an injected scheduler
//!
//! ## Key Components
//!
//! - [`Planner`]: owns lists and the active timer
//! - [`TimerEngine`]: countdown state machine
//! - [`Scheduler`]: tick source capability
//! - [`Notifier`]: notification sink
//! - [`Config`]: application configuration management

pub mod cascade;
pub mod codec;
pub mod error;
pub mod events;
pub mod model;
pub mod notify;
pub mod planner;
pub mod storage;
pub mod timer;

pub use cascade::recalculate;
pub use codec::{
    format_countdown, format_duration, format_wall_time, parse_duration, parse_wall_time, Clock,
    FixedClock, SystemClock, WallTime,
};
pub use error::{ConfigError, CoreError, StateError, ValidationError};
pub use events::{Event, StopReason};
pub use model::{ListId, Routine, RoutineId, RoutineList};
pub use notify::{Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use planner::{DragContext, Planner};
pub use storage::Config;
pub use timer::{ActiveTimer, ManualScheduler, Scheduler, TickHandle, TimerEngine, TimerState};
