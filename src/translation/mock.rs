//! Scripted in-process backend for exercising the pipeline without a network.
//!
//! Each call pops the next scripted step; once the script runs out the
//! fallback behavior answers. Every request is recorded so tests can assert
//! on batch sizes, prompts and ordering.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use super::client::{ChatBackend, ChatRequest};
use super::codec;
use crate::error::CompletionError;

/// What the backend does for one call.
pub enum Step {
    /// Reply with fixed text.
    Reply(String),
    /// Fail with the given error.
    Fail(CompletionError),
    /// Reply by transforming the request.
    With(Box<dyn Fn(&RecordedRequest) -> Result<String, CompletionError> + Send + Sync>),
}

/// A copy of a request the backend received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub temperature: f32,
    pub system: String,
    pub user: String,
}

impl RecordedRequest {
    /// Source lines recovered from the numbered user payload.
    pub fn lines(&self) -> Vec<String> {
        let count = self.user.lines().count();
        codec::decode(&self.user, count).lines
    }
}

#[derive(Default)]
struct State {
    script: VecDeque<Step>,
    requests: Vec<RecordedRequest>,
}

/// Chat backend driven by a script of [`Step`]s.
#[derive(Clone)]
pub struct ScriptedBackend {
    state: Arc<Mutex<State>>,
    fallback: Arc<Step>,
}

impl ScriptedBackend {
    pub fn new(fallback: Step) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            fallback: Arc::new(fallback),
        }
    }

    /// Backend that answers every batch with a correctly numbered,
    /// prefixed echo of its lines.
    pub fn echo(prefix: &str) -> Self {
        let prefix = prefix.to_string();
        Self::new(Step::With(Box::new(move |request: &RecordedRequest| {
            Ok(echo_reply(&request.lines(), &prefix))
        })))
    }

    /// Backend that fails every call with a transport error.
    pub fn failing() -> Self {
        Self::new(Step::With(Box::new(|_: &RecordedRequest| {
            Err(CompletionError::Request("connection refused".into()))
        })))
    }

    /// Queues a step to be used before the fallback.
    #[must_use]
    pub fn then(self, step: Step) -> Self {
        self.lock().script.push_back(step);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builds a complete numbered reply that prefixes every line.
pub fn echo_reply(lines: &[String], prefix: &str) -> String {
    let translated: Vec<String> = lines.iter().map(|line| format!("{prefix}{line}")).collect();
    codec::encode(&translated)
}

fn run_step(step: &Step, request: &RecordedRequest) -> Result<String, CompletionError> {
    match step {
        Step::Reply(text) => Ok(text.clone()),
        Step::Fail(err) => Err(clone_error(err)),
        Step::With(f) => f(request),
    }
}

fn clone_error(err: &CompletionError) -> CompletionError {
    match err {
        CompletionError::Authentication(m) => CompletionError::Authentication(m.clone()),
        CompletionError::UnknownModel(m) => CompletionError::UnknownModel(m.clone()),
        CompletionError::RateLimited(m) => CompletionError::RateLimited(m.clone()),
        CompletionError::Api { status, body } => CompletionError::Api {
            status: *status,
            body: body.clone(),
        },
        CompletionError::Request(m) => CompletionError::Request(m.clone()),
        CompletionError::MalformedResponse(m) => CompletionError::MalformedResponse(m.clone()),
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String, CompletionError> {
        let recorded = RecordedRequest {
            model: request.model.to_string(),
            temperature: request.temperature,
            system: request.system.to_string(),
            user: request.user.to_string(),
        };

        let next = {
            let mut state = self.lock();
            state.requests.push(recorded.clone());
            state.script.pop_front()
        };

        match next {
            Some(step) => run_step(&step, &recorded),
            None => run_step(&self.fallback, &recorded),
        }
    }
}
