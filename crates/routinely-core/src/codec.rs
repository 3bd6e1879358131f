//! Duration and wall-clock codec.
//!
//! Durations are whole seconds. Wall times are a time-of-day only; the date
//! is irrelevant and arithmetic wraps at midnight.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Local, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Parse a user-entered duration into seconds.
///
/// A bare number is whole minutes. Otherwise the input must be `H:MM:SS`
/// or `MM:SS`. Negative results clamp to zero.
pub fn parse_duration(input: &str) -> Result<u64, ValidationError> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidDuration(input.to_string());

    if trimmed.is_empty() {
        return Err(invalid());
    }

    if !trimmed.contains(':') {
        let minutes: i64 = trimmed.parse().map_err(|_| invalid())?;
        return Ok(clamp_secs(minutes.saturating_mul(60)));
    }

    let parts = trimmed
        .split(':')
        .map(|p| p.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;

    let total = match parts.as_slice() {
        [m, s] => m.saturating_mul(60).saturating_add(*s),
        [h, m, s] => h
            .saturating_mul(3600)
            .saturating_add(m.saturating_mul(60))
            .saturating_add(*s),
        _ => return Err(invalid()),
    };
    Ok(clamp_secs(total))
}

fn clamp_secs(secs: i64) -> u64 {
    secs.max(0) as u64
}

/// Render a duration for routine cards: `H:MM:SS`, `M:SS`, or `Ns`.
pub fn format_duration(secs: u64) -> String {
    let (h, m, s) = split_hms(secs);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else if m > 0 {
        format!("{m}:{s:02}")
    } else {
        format!("{s}s")
    }
}

/// Render a running countdown: always zero-padded, `HH:MM:SS` or `MM:SS`.
pub fn format_countdown(secs: u64) -> String {
    let (h, m, s) = split_hms(secs);
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

fn split_hms(secs: u64) -> (u64, u64, u64) {
    (secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// A wall-clock time of day with whole-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime(NaiveTime);

impl WallTime {
    pub fn from_hms(hour: u32, min: u32, sec: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, min, sec).map(Self)
    }

    /// Parse `HH:MM:SS` or `HH:MM`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            .map(Self)
            .map_err(|_| ValidationError::InvalidWallTime(input.to_string()))
    }

    /// Current local time of day, truncated to the second.
    pub fn now() -> Self {
        let time = Local::now().time();
        Self(time.with_nanosecond(0).unwrap_or(time))
    }

    /// Add a number of seconds, wrapping past midnight.
    pub fn plus_secs(self, secs: u64) -> Self {
        let offset = Duration::seconds((secs % SECS_PER_DAY) as i64);
        let (time, _) = self.0.overflowing_add_signed(offset);
        Self(time)
    }

    pub fn seconds_from_midnight(self) -> u32 {
        self.0.num_seconds_from_midnight()
    }

    pub fn format(self) -> String {
        self.0.format("%H:%M:%S").to_string()
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for WallTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WallTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WallTime> for String {
    fn from(value: WallTime) -> Self {
        value.format()
    }
}

/// Parse an `HH:MM:SS` (or `HH:MM`) string into a [`WallTime`].
pub fn parse_wall_time(input: &str) -> Result<WallTime, ValidationError> {
    WallTime::parse(input)
}

/// Format a [`WallTime`] as `HH:MM:SS`.
pub fn format_wall_time(time: WallTime) -> String {
    time.format()
}

/// Source of the current time of day.
///
/// Used wherever the planner needs "now": the start of a routine added to
/// an empty list without an explicit start, and the cascade fallback.
pub trait Clock {
    fn now(&self) -> WallTime;
}

/// Reads the local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> WallTime {
        WallTime::now()
    }
}

/// Always reports the same time. Useful for deterministic tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub WallTime);

impl Clock for FixedClock {
    fn now(&self) -> WallTime {
        self.0
    }
}
