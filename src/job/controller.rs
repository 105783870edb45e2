use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::debug;

use super::events::{EventReceiver, EventSender};
use super::{CancelToken, JobOutcome, JobRequest, JobState, Orchestrator};
use crate::error::JobError;
use crate::translation::ChatBackend;

/// Start/stop control over at most one job at a time.
pub struct JobController<B: ChatBackend + ?Sized> {
    orchestrator: Arc<Orchestrator<B>>,
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    active: Mutex<Option<CancelToken>>,
    state: Mutex<JobState>,
}

impl Shared {
    fn set_state(&self, state: JobState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

/// Clears the active slot when the worker ends, even by panic or abort.
struct ActiveGuard(Arc<Shared>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        {
            let mut state = self.0.state.lock().unwrap_or_else(PoisonError::into_inner);
            if *state == JobState::Running {
                *state = JobState::Failed;
            }
        }
        self.0
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

/// A started job: its event stream and its worker task.
pub struct JobHandle {
    pub events: EventReceiver,
    cancel: CancelToken,
    task: JoinHandle<Result<JobOutcome, JobError>>,
}

impl JobHandle {
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Drops the worker mid-request. Nothing is saved.
    pub async fn abort(&mut self) {
        self.cancel.cancel();
        self.task.abort();
        let _ = (&mut self.task).await;
    }

    /// Waits for the worker without draining events.
    pub async fn wait(self) -> Result<JobOutcome, JobError> {
        self.task
            .await
            .map_err(|e| JobError::Worker(e.to_string()))?
    }
}

impl<B: ChatBackend + ?Sized + 'static> JobController<B> {
    pub fn new(orchestrator: Orchestrator<B>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            shared: Arc::new(Shared {
                active: Mutex::new(None),
                state: Mutex::new(JobState::Idle),
            }),
        }
    }

    /// Validates `request` and runs it on a background task.
    ///
    /// Fails with [`JobError::AlreadyRunning`] while another job is active.
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, request: JobRequest) -> Result<JobHandle, JobError> {
        request.validate()?;

        let cancel = CancelToken::new();
        {
            let mut active = self
                .shared
                .active
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if active.is_some() {
                return Err(JobError::AlreadyRunning);
            }
            *active = Some(cancel.clone());
        }
        self.shared.set_state(JobState::Running);

        let (events, rx) = EventSender::channel();
        let orchestrator = Arc::clone(&self.orchestrator);
        let shared = Arc::clone(&self.shared);
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let guard = ActiveGuard(Arc::clone(&shared));
            let result = orchestrator.run(&request, &token, &events).await;
            shared.set_state(match &result {
                Ok(JobOutcome::Completed { .. }) => JobState::Completed,
                Ok(JobOutcome::PartiallyCompleted { .. }) => JobState::PartiallyCompleted,
                Err(_) => JobState::Failed,
            });
            drop(guard);
            result
        });

        Ok(JobHandle {
            events: rx,
            cancel,
            task,
        })
    }

    /// Asks the running job to stop after its current window.
    ///
    /// Returns `false` when nothing is running or a stop was already requested.
    pub fn stop(&self) -> bool {
        let active = self
            .shared
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match active.as_ref() {
            Some(token) => {
                let first = token.cancel();
                if first {
                    debug!("stop requested");
                }
                first
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn state(&self) -> JobState {
        *self.shared.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::translation::mock::ScriptedBackend;
    use std::time::Duration;
    use tempfile::TempDir;

    fn request(dir: &TempDir, lines: usize) -> JobRequest {
        let input = dir.path().join("ep.srt");
        let body: String = (1..=lines)
            .map(|i| format!("{i}\n00:00:{i:02},000 --> 00:00:{i:02},500\nline {i}\n\n"))
            .collect();
        std::fs::write(&input, body).unwrap();
        JobRequest {
            input_path: input,
            output_path: None,
            window_size: 2,
            temperature: 1.0,
            max_retries: 0,
            source_language: "English".into(),
            target_language: "French".into(),
            deep_context: false,
            context_hint: None,
            translation_model: "m".into(),
            summary_model: String::new(),
        }
    }

    fn controller(backend: ScriptedBackend) -> JobController<ScriptedBackend> {
        JobController::new(Orchestrator::new(Arc::new(backend)).with_retry_delay(Duration::ZERO))
    }

    #[tokio::test]
    async fn test_stop_when_idle_is_noop() {
        let controller = controller(ScriptedBackend::echo("fr:"));
        assert!(!controller.stop());
        assert_eq!(controller.state(), JobState::Idle);
    }

    #[tokio::test]
    async fn test_invalid_request_rejected_before_start() {
        let dir = TempDir::new().unwrap();
        let controller = controller(ScriptedBackend::echo("fr:"));
        let mut req = request(&dir, 3);
        req.window_size = 0;
        assert!(matches!(
            controller.start(req),
            Err(JobError::Validation(_))
        ));
        assert!(!controller.is_running());
    }

    #[tokio::test]
    async fn test_job_completes_and_frees_slot() {
        let dir = TempDir::new().unwrap();
        let controller = controller(ScriptedBackend::echo("fr:"));
        let handle = controller.start(request(&dir, 3)).unwrap();
        let outcome = handle.wait().await.unwrap();

        assert!(matches!(outcome, JobOutcome::Completed { lines: 3, .. }));
        assert!(!controller.is_running());
        assert_eq!(controller.state(), JobState::Completed);
    }

    #[tokio::test]
    async fn test_failed_job_reports_failed_state() {
        let dir = TempDir::new().unwrap();
        let controller = controller(ScriptedBackend::echo("fr:"));
        let mut req = request(&dir, 1);
        req.input_path = dir.path().join("missing.srt");
        let handle = controller.start(req).unwrap();

        assert!(matches!(
            handle.wait().await,
            Err(JobError::InputNotFound(_))
        ));
        assert_eq!(controller.state(), JobState::Failed);
        assert!(!controller.is_running());
    }
}
