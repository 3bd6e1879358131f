//! Notification sink.
//!
//! The planner emits plain-text notifications; the host decides whether
//! they become speech, a tone, a toast, or a log line.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    RoutineComplete { name: String },
    AllComplete { list: String },
    EmptyList { list: String },
    TimerInvalidated { list: String },
    TimerStopped { list: String },
    InvalidInput { message: String },
}

impl Notification {
    pub fn message(&self) -> String {
        match self {
            Notification::RoutineComplete { name } => format!("{name} is done."),
            Notification::AllComplete { list } => format!("All routines in {list} complete."),
            Notification::EmptyList { list } => format!("There are no routines in {list}."),
            Notification::TimerInvalidated { list } => {
                format!("Timer for {list} stopped because its routines changed.")
            }
            Notification::TimerStopped { list } => format!("Timer for {list} stopped."),
            Notification::InvalidInput { message } => message.clone(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Receives every notification the planner emits.
pub trait Notifier {
    fn notify(&mut self, notification: &Notification);
}

/// Writes notifications to the `tracing` log.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, notification: &Notification) {
        info!(target: "routinely::notify", "{notification}");
    }
}

/// Keeps every notification in memory, in emission order.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub received: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.received.iter().map(Notification::message).collect()
    }

    pub fn count(&self, pred: impl Fn(&Notification) -> bool) -> usize {
        self.received.iter().filter(|n| pred(n)).count()
    }

    pub fn clear(&mut self) {
        self.received.clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: &Notification) {
        self.received.push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_spoken_text() {
        let done = Notification::RoutineComplete { name: "Stretch".into() };
        assert_eq!(done.to_string(), "Stretch is done.");

        let all = Notification::AllComplete { list: "Morning".into() };
        assert_eq!(all.message(), "All routines in Morning complete.");
    }

    #[test]
    fn recording_notifier_keeps_order() {
        let mut sink = RecordingNotifier::new();
        sink.notify(&Notification::TimerStopped { list: "A".into() });
        sink.notify(&Notification::EmptyList { list: "B".into() });
        assert_eq!(
            sink.messages(),
            vec!["Timer for A stopped.", "There are no routines in B."]
        );
        assert_eq!(
            sink.count(|n| matches!(n, Notification::EmptyList { .. })),
            1
        );
    }
}
