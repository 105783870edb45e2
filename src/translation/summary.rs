use tracing::{debug, info};

use super::client::{ChatBackend, ChatRequest};
use super::prompt::build_summary_instruction;
use crate::error::CompletionError;

/// Upper bound on the characters of subtitle text sent for summarizing.
pub const MAX_SUMMARY_INPUT_CHARS: usize = 12_000;

/// Sampling temperature for the summary call.
pub const SUMMARY_TEMPERATURE: f32 = 0.3;

/// Produces a short abstract of a whole subtitle file in one request.
///
/// There is no retry: a failed summary is returned to the caller, which is
/// expected to abort the job.
pub async fn summarize<B: ChatBackend + ?Sized>(
    backend: &B,
    model: &str,
    lines: &[String],
    target_language: &str,
    temperature: f32,
) -> Result<String, CompletionError> {
    let joined = lines.join("\n");
    let payload = truncate_chars(&joined, MAX_SUMMARY_INPUT_CHARS);
    if payload.len() < joined.len() {
        debug!(
            kept = MAX_SUMMARY_INPUT_CHARS,
            "summary input truncated"
        );
    }

    let instruction = build_summary_instruction(target_language);
    let reply = backend
        .complete(ChatRequest {
            model,
            temperature,
            system: &instruction,
            user: payload,
        })
        .await?;

    let summary = reply.trim().to_string();
    info!(chars = summary.chars().count(), "summary generated");
    Ok(summary)
}

/// Cuts `text` after `max_chars` characters, respecting UTF-8 boundaries.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(byte_index, _)| &text[..byte_index])
}
