//! Translation jobs: one subtitle file, windowed through the model.

mod cancel;
mod controller;
mod events;
mod orchestrator;

use std::path::PathBuf;

pub use cancel::CancelToken;
pub use controller::{JobController, JobHandle};
pub use events::{Eta, EventReceiver, EventSender, JobEvent, estimate_eta, format_duration};
pub use orchestrator::Orchestrator;

use crate::error::JobError;
use crate::paths::derive_output_path;

pub const DEFAULT_WINDOW_SIZE: usize = 10;
pub const DEFAULT_TEMPERATURE: f32 = 1.3;
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Everything needed to run one job.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub input_path: PathBuf,
    /// Derived from the input and target language when absent.
    pub output_path: Option<PathBuf>,
    /// Lines per request.
    pub window_size: usize,
    pub temperature: f32,
    /// Extra attempts per window after the first.
    pub max_retries: u32,
    pub source_language: String,
    pub target_language: String,
    /// Summarize the whole file first and put the summary in the prompt.
    pub deep_context: bool,
    /// Free-text topic, ignored when `deep_context` is set.
    pub context_hint: Option<String>,
    pub translation_model: String,
    pub summary_model: String,
}

impl JobRequest {
    /// Rejects settings that cannot produce a valid run.
    pub fn validate(&self) -> Result<(), JobError> {
        if self.input_path.as_os_str().is_empty() {
            return Err(JobError::Validation("input path is empty".into()));
        }
        if self.window_size == 0 {
            return Err(JobError::Validation("window size must be positive".into()));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(JobError::Validation(format!(
                "temperature must be a non-negative number, got {}",
                self.temperature
            )));
        }
        for (value, name) in [
            (&self.source_language, "source language"),
            (&self.target_language, "target language"),
            (&self.translation_model, "translation model"),
        ] {
            if value.trim().is_empty() {
                return Err(JobError::Validation(format!("{name} must not be empty")));
            }
        }
        if self.deep_context && self.summary_model.trim().is_empty() {
            return Err(JobError::Validation(
                "a summary model is required when deep context is enabled".into(),
            ));
        }
        Ok(())
    }

    /// The explicit output path, or one derived from the input file.
    pub fn resolved_output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| derive_output_path(&self.input_path, &self.target_language))
    }
}

/// How a job that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed {
        output_path: PathBuf,
        lines: usize,
        warnings: usize,
    },
    /// Stopped by the user; the translated prefix was saved.
    PartiallyCompleted {
        output_path: PathBuf,
        translated: usize,
        total: usize,
        warnings: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
    Completed,
    PartiallyCompleted,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> JobRequest {
        JobRequest {
            input_path: PathBuf::from("/subs/ep01.srt"),
            output_path: None,
            window_size: DEFAULT_WINDOW_SIZE,
            temperature: DEFAULT_TEMPERATURE,
            max_retries: DEFAULT_MAX_RETRIES,
            source_language: "English".into(),
            target_language: "French".into(),
            deep_context: false,
            context_hint: None,
            translation_model: "gpt-4o-mini".into(),
            summary_model: String::new(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut req = request();
        req.window_size = 0;
        assert!(matches!(req.validate(), Err(JobError::Validation(m)) if m.contains("window")));
    }

    #[test]
    fn test_negative_or_nan_temperature_rejected() {
        let mut req = request();
        req.temperature = -0.1;
        assert!(req.validate().is_err());
        req.temperature = f32::NAN;
        assert!(req.validate().is_err());
        req.temperature = 0.0;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_blank_language_rejected() {
        let mut req = request();
        req.target_language = "  ".into();
        assert!(matches!(req.validate(), Err(JobError::Validation(m)) if m.contains("target")));
    }

    #[test]
    fn test_deep_context_requires_summary_model() {
        let mut req = request();
        req.deep_context = true;
        assert!(req.validate().is_err());
        req.summary_model = "gpt-4o".into();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_output_path_derivation() {
        let mut req = request();
        assert_eq!(req.resolved_output_path(), PathBuf::from("/subs/ep01_french.srt"));

        req.output_path = Some(PathBuf::from("/out/custom.srt"));
        assert_eq!(req.resolved_output_path(), PathBuf::from("/out/custom.srt"));
    }
}
