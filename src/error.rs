//! Error types shared across the translation pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a chat-completion backend.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// The endpoint rejected the API key.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The requested model does not exist on the endpoint.
    #[error("Model '{0}' not found")]
    UnknownModel(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Any other non-success HTTP status.
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// Connection, TLS or timeout failure before a response was received.
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Malformed API response: {0}")]
    MalformedResponse(String),
}

/// Errors raised while loading or saving subtitle files.
#[derive(Error, Debug)]
pub enum SubtitleError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported subtitle format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Failed to load subtitle file {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    #[error("Failed to save subtitle file {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort a translation job.
///
/// Per-batch problems never appear here: they are folded into fallback
/// lines and surfaced as batch warnings instead.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Subtitle error: {0}")]
    Subtitle(SubtitleError),

    /// The deep-context summary could not be produced.
    #[error("Failed to generate summary: {0}")]
    Summary(#[source] CompletionError),

    #[error("Invalid job settings: {0}")]
    Validation(String),

    #[error("A translation job is already running")]
    AlreadyRunning,

    /// The worker task panicked or was aborted.
    #[error("Translation worker stopped unexpectedly: {0}")]
    Worker(String),
}

impl From<SubtitleError> for JobError {
    fn from(err: SubtitleError) -> Self {
        match err {
            SubtitleError::NotFound(path) => Self::InputNotFound(path),
            other => Self::Subtitle(other),
        }
    }
}
