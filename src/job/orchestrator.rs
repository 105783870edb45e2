use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use super::events::{Eta, EventSender, JobEvent, estimate_eta};
use super::{CancelToken, JobOutcome, JobRequest};
use crate::error::JobError;
use crate::paths::partial_output_path;
use crate::subtitle;
use crate::translation::prompt::{build_summary_system_prompt, build_system_prompt};
use crate::translation::{
    BatchTranslator, ChatBackend, DEFAULT_RETRY_DELAY, SUMMARY_TEMPERATURE, summarize,
};

/// Drives a whole file through the model, one window at a time.
pub struct Orchestrator<B: ChatBackend + ?Sized> {
    backend: Arc<B>,
    retry_delay: Duration,
}

impl<B: ChatBackend + ?Sized> Orchestrator<B> {
    pub const fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Runs a job to completion.
    ///
    /// Windows are sent strictly in order. `cancel` is checked before each
    /// window; once set, no further request is issued and the translated
    /// prefix is written to the `_partial` variant of the output path.
    pub async fn run(
        &self,
        request: &JobRequest,
        cancel: &CancelToken,
        events: &EventSender,
    ) -> Result<JobOutcome, JobError> {
        request.validate()?;
        let output_path = request.resolved_output_path();
        let window_size = request.window_size;

        events.status("Loading subtitles...");
        let mut document = subtitle::load(&request.input_path)?;
        let texts = document.texts();
        let total = texts.len();
        events.status(format!("Loaded {total} lines"));

        let system_prompt = self.system_prompt(request, &texts, events).await?;

        events.send(JobEvent::Progress { done: 0, total });
        events.send(JobEvent::Eta(Eta::InsufficientData));

        let translator = BatchTranslator::new(
            self.backend.as_ref(),
            &request.translation_model,
            request.temperature,
            request.max_retries,
        )
        .with_retry_delay(self.retry_delay);

        let mut translated: Vec<String> = Vec::with_capacity(total);
        let mut durations = Vec::new();
        let mut warnings = 0;
        let mut stopped = false;

        for (index, window) in texts.chunks(window_size).enumerate() {
            if cancel.is_cancelled() {
                info!(done = translated.len(), total, "job stopped at window boundary");
                events.status("Stop requested, saving partial result...");
                stopped = true;
                break;
            }

            let first = index * window_size;
            let lines = first..first + window.len();
            events.status(format!("Translating lines {}-{}...", lines.start + 1, lines.end));

            let started = Instant::now();
            let outcome = translator.translate(window, &system_prompt).await;
            durations.push(started.elapsed());

            if let Some(message) = outcome.warning {
                warnings += 1;
                warn!(start = lines.start + 1, end = lines.end, %message, "window fell back");
                events.send(JobEvent::BatchWarning {
                    lines: lines.clone(),
                    message,
                });
            } else {
                events.status(format!("Finished lines {}-{}", lines.start + 1, lines.end));
            }

            events.send(JobEvent::BatchPreview {
                source: window.to_vec(),
                translated: outcome.lines.clone(),
            });
            translated.extend(outcome.lines);

            let done = translated.len().min(total);
            events.send(JobEvent::Progress { done, total });
            events.send(JobEvent::Eta(estimate_eta(
                &durations,
                total - done,
                window_size,
            )));
        }

        let translated_count = translated.len().min(total);
        let translated = subtitle::reconcile(translated, total);

        if stopped {
            let partial_path = partial_output_path(&output_path);
            events.status(format!("Saving partial result to {}...", partial_path.display()));
            document.apply(&translated[..translated_count]);
            document.write(&partial_path)?;
            return Ok(JobOutcome::PartiallyCompleted {
                output_path: partial_path,
                translated: translated_count,
                total,
                warnings,
            });
        }

        events.status(format!("Saving result to {}...", output_path.display()));
        subtitle::save(&mut document, &output_path, translated, total)?;
        info!(lines = total, warnings, "job completed");

        Ok(JobOutcome::Completed {
            output_path,
            lines: total,
            warnings,
        })
    }

    async fn system_prompt(
        &self,
        request: &JobRequest,
        texts: &[String],
        events: &EventSender,
    ) -> Result<String, JobError> {
        if !request.deep_context {
            return Ok(build_system_prompt(
                &request.source_language,
                &request.target_language,
                request.context_hint.as_deref(),
            ));
        }

        events.status("Generating content summary...");
        let summary = summarize(
            self.backend.as_ref(),
            &request.summary_model,
            texts,
            &request.target_language,
            SUMMARY_TEMPERATURE,
        )
        .await
        .map_err(JobError::Summary)?;
        events.send(JobEvent::Summary(summary.clone()));

        Ok(build_summary_system_prompt(
            &request.source_language,
            &request.target_language,
            &summary,
        ))
    }
}
