use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::job::{Eta, format_duration};

/// Line-count progress bar for a running job.
///
/// The status text goes in the message slot and the ETA in the prefix
/// slot. Output printed through [`JobProgress::println`] stays above the bar.
pub struct JobProgress {
    progress_bar: ProgressBar,
}

impl JobProgress {
    #[allow(clippy::unwrap_used)]
    pub fn new() -> Self {
        let progress_bar = ProgressBar::new(0);
        // unwrap is safe: template string is a compile-time constant
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{bar:30.cyan/blue}] {pos}/{len} lines  ETA: {prefix}  {msg}")
                .unwrap()
                .progress_chars("=> "),
        );
        progress_bar.set_prefix(eta_label(Eta::InsufficientData));
        progress_bar.enable_steady_tick(Duration::from_millis(120));

        Self { progress_bar }
    }

    pub fn set_progress(&self, done: usize, total: usize) {
        self.progress_bar.set_length(total as u64);
        self.progress_bar.set_position(done as u64);
    }

    pub fn set_eta(&self, eta: Eta) {
        self.progress_bar.set_prefix(eta_label(eta));
    }

    pub fn set_status(&self, status: &str) {
        self.progress_bar.set_message(status.to_string());
    }

    pub fn println(&self, line: impl AsRef<str>) {
        self.progress_bar.println(line);
    }

    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl Default for JobProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for JobProgress {
    fn drop(&mut self) {
        self.progress_bar.finish_and_clear();
    }
}

/// ETA as shown to the user.
pub fn eta_label(eta: Eta) -> String {
    match eta {
        Eta::InsufficientData => "waiting for at least 2 windows".to_string(),
        Eta::Remaining(remaining) => format_duration(remaining),
    }
}
