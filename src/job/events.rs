//! One-way notifications from a running job to whatever displays it.

use std::ops::Range;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Remaining-time estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eta {
    /// Fewer than two windows have finished.
    InsufficientData,
    Remaining(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Status(String),
    /// Lines translated so far out of the total.
    Progress { done: usize, total: usize },
    Eta(Eta),
    /// The deep-context summary that seeds the system prompt.
    Summary(String),
    /// A window fell back to source text; the job keeps going.
    BatchWarning { lines: Range<usize>, message: String },
    /// Source and translated text of a finished window.
    BatchPreview {
        source: Vec<String>,
        translated: Vec<String>,
    },
}

pub type EventReceiver = UnboundedReceiver<JobEvent>;

/// Sending half of the event channel.
///
/// A closed channel means nobody is watching; events are then dropped and
/// the job carries on.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Option<UnboundedSender<JobEvent>>,
}

impl EventSender {
    pub fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sender that discards everything.
    pub const fn disconnected() -> Self {
        Self { tx: None }
    }

    pub fn send(&self, event: JobEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn status(&self, message: impl Into<String>) {
        self.send(JobEvent::Status(message.into()));
    }
}

/// Mean window duration times the number of windows still to go.
///
/// Needs at least two samples; a single window is too noisy to project.
pub fn estimate_eta(durations: &[Duration], remaining_lines: usize, window_size: usize) -> Eta {
    if durations.len() < 2 || window_size == 0 {
        return Eta::InsufficientData;
    }
    let total: Duration = durations.iter().sum();
    let mean = total / durations.len() as u32;
    let remaining_windows = remaining_lines.div_ceil(window_size) as u32;
    Eta::Remaining(mean * remaining_windows)
}

/// Formats a duration as `H:MM:SS`, dropping fractions of a second.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
