//! One window's request/response cycle, with retries and fallback output.

use std::time::Duration;
use tracing::{debug, warn};

use super::client::{ChatBackend, ChatRequest};
use super::codec;
use super::prompt::{LINE_BREAK, WARNING_MARKER, default_system_prompt, fallback_line};

/// Pause between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Longest warning text embedded in a subtitle line.
pub const MAX_INLINE_WARNING_CHARS: usize = 160;

/// Result of translating one batch.
///
/// `lines` always has exactly one entry per source line.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub lines: Vec<String>,
    pub warning: Option<String>,
}

/// Translates windows of subtitle text through a [`ChatBackend`].
pub struct BatchTranslator<'a, B: ChatBackend + ?Sized> {
    backend: &'a B,
    model: &'a str,
    temperature: f32,
    max_retries: u32,
    retry_delay: Duration,
}

impl<'a, B: ChatBackend + ?Sized> BatchTranslator<'a, B> {
    pub const fn new(backend: &'a B, model: &'a str, temperature: f32, max_retries: u32) -> Self {
        Self {
            backend,
            model,
            temperature,
            max_retries,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Translates `lines`, retrying up to `max_retries` times with an
    /// identical request.
    ///
    /// Never fails: transport errors on the last attempt and replies that
    /// never decode completely both produce fallback output plus a warning.
    pub async fn translate(&self, lines: &[String], system_prompt: &str) -> BatchOutcome {
        if lines.is_empty() {
            return BatchOutcome {
                lines: Vec::new(),
                warning: None,
            };
        }

        let system = if system_prompt.trim().is_empty() {
            default_system_prompt()
        } else {
            system_prompt.trim().to_string()
        };
        let payload = codec::encode(lines);
        let request = ChatRequest {
            model: self.model,
            temperature: self.temperature,
            system: &system,
            user: &payload,
        };

        // u32::MAX retries saturates instead of wrapping to zero attempts
        let attempts = self.max_retries.saturating_add(1);
        let mut last_decode = None;

        for attempt in 1..=attempts {
            match self.backend.complete(request).await {
                Ok(reply) => {
                    let decoded = codec::decode(&reply, lines.len());
                    if decoded.is_complete() {
                        debug!(attempt, lines = lines.len(), "batch translated");
                        return BatchOutcome {
                            lines: decoded.lines,
                            warning: None,
                        };
                    }
                    warn!(
                        attempt,
                        attempts,
                        filled = decoded.filled,
                        expected = lines.len(),
                        "incomplete translation reply"
                    );
                    last_decode = Some(decoded.lines);
                }
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "translation request failed");
                    if attempt == attempts {
                        let warning = format!("{WARNING_MARKER} request failed: {e}");
                        return failure_output(lines, &warning, None);
                    }
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        let warning = format!(
            "{WARNING_MARKER} translation failed or line count mismatch (after {attempts} attempts)"
        );
        failure_output(lines, &warning, last_decode.as_deref())
    }
}

/// Fills every unresolved slot with tagged source text and prefixes the
/// first line with the warning, joined by the subtitle line-break escape.
///
/// The warning is collapsed to one line and capped at
/// [`MAX_INLINE_WARNING_CHARS`], since it may carry a raw HTTP error body.
pub fn failure_output(originals: &[String], warning: &str, partial: Option<&[String]>) -> BatchOutcome {
    let warning = inline_warning(warning);
    let mut lines: Vec<String> = originals
        .iter()
        .enumerate()
        .map(|(i, original)| {
            partial
                .and_then(|p| p.get(i))
                .filter(|t| !t.is_empty())
                .cloned()
                .unwrap_or_else(|| fallback_line(original))
        })
        .collect();

    if let Some(first) = lines.first_mut() {
        *first = format!("{warning}{LINE_BREAK}{first}");
    }

    BatchOutcome {
        lines,
        warning: Some(warning),
    }
}

/// Single-line, length-capped form of `warning`.
fn inline_warning(warning: &str) -> String {
    let collapsed = warning.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(MAX_INLINE_WARNING_CHARS) {
        Some((cut, _)) => format!("{}…", &collapsed[..cut]),
        None => collapsed,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CompletionError;
    use crate::translation::mock::{ScriptedBackend, Step, echo_reply};

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn translator(backend: &ScriptedBackend, retries: u32) -> BatchTranslator<'_, ScriptedBackend> {
        BatchTranslator::new(backend, "test-model", 0.7, retries).with_retry_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_complete_reply_succeeds_first_try() {
        let backend = ScriptedBackend::echo("fr:");
        let source = lines(&["Hello", "World"]);

        let outcome = translator(&backend, 2).translate(&source, "prompt").await;

        assert_eq!(outcome.lines, vec!["fr:Hello", "fr:World"]);
        assert_eq!(outcome.warning, None);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_request_shape() {
        let backend = ScriptedBackend::echo("");
        let source = lines(&["a", "b"]);

        translator(&backend, 0).translate(&source, "  custom prompt ").await;

        let request = &backend.requests()[0];
        assert_eq!(request.model, "test-model");
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.system, "custom prompt");
        assert_eq!(request.user, "[1] a\n[2] b");
    }

    #[tokio::test]
    async fn test_blank_system_prompt_uses_default() {
        let backend = ScriptedBackend::echo("");
        translator(&backend, 0).translate(&lines(&["a"]), "   ").await;
        assert_eq!(backend.requests()[0].system, default_system_prompt());
    }

    #[tokio::test]
    async fn test_incomplete_then_complete_retries_identically() {
        let backend = ScriptedBackend::echo("T:").then(Step::Reply("[1] only one".into()));
        let source = lines(&["a", "b"]);

        let outcome = translator(&backend, 1).translate(&source, "p").await;

        assert_eq!(outcome.lines, vec!["T:a", "T:b"]);
        assert!(outcome.warning.is_none());
        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].user, requests[1].user);
        assert_eq!(requests[0].system, requests[1].system);
    }

    #[tokio::test]
    async fn test_transport_error_then_success() {
        let backend = ScriptedBackend::echo("T:")
            .then(Step::Fail(CompletionError::RateLimited("busy".into())));

        let outcome = translator(&backend, 1).translate(&lines(&["a"]), "p").await;

        assert_eq!(outcome.lines, vec!["T:a"]);
        assert!(outcome.warning.is_none());
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_transport_error_on_last_attempt_stops_immediately() {
        let backend = ScriptedBackend::failing();
        let source = lines(&["a", "b", "c"]);

        let outcome = translator(&backend, 2).translate(&source, "p").await;

        assert_eq!(backend.call_count(), 3);
        let warning = outcome.warning.unwrap();
        assert!(warning.starts_with(WARNING_MARKER));
        assert!(warning.contains("connection refused"));
        assert_eq!(
            outcome.lines,
            vec![
                format!("{warning}\\N[untranslated] a"),
                "[untranslated] b".to_string(),
                "[untranslated] c".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_exhausted_retries_keep_partial_translation() {
        let backend = ScriptedBackend::new(Step::Reply("[1] un\n[3] \n[9] extra".into()));
        let source = lines(&["one", "two", "three"]);

        let outcome = translator(&backend, 1).translate(&source, "p").await;

        assert_eq!(backend.call_count(), 2);
        let warning = outcome.warning.clone().unwrap();
        assert!(warning.contains("after 2 attempts"));
        assert_eq!(outcome.lines[0], format!("{warning}\\Nun"));
        assert_eq!(outcome.lines[1], "[untranslated] two");
        assert_eq!(outcome.lines[2], "[untranslated] three");
    }

    #[tokio::test]
    async fn test_zero_fills_produce_all_fallback() {
        let backend = ScriptedBackend::new(Step::Reply("I cannot help with that.".into()));
        let source = lines(&["x", "y"]);

        let outcome = translator(&backend, 0).translate(&source, "p").await;

        let warning = outcome.warning.clone().unwrap();
        assert_eq!(
            outcome.lines,
            vec![format!("{warning}\\N[untranslated] x"), "[untranslated] y".to_string()]
        );
    }

    #[tokio::test]
    async fn test_length_invariant_for_hostile_replies() {
        let source = lines(&["a", "b", "c", "d"]);
        let replies = [
            String::new(),
            "garbage".to_string(),
            echo_reply(&lines(&["1", "2", "3", "4", "5", "6", "7", "8", "9"]), ""),
            "[2] only\n[2] dup".to_string(),
        ];

        for reply in replies {
            let backend = ScriptedBackend::new(Step::Reply(reply));
            let outcome = translator(&backend, 1).translate(&source, "p").await;
            assert_eq!(outcome.lines.len(), source.len());
        }
    }

    #[tokio::test]
    async fn test_empty_batch_sends_nothing() {
        let backend = ScriptedBackend::failing();
        let outcome = translator(&backend, 3).translate(&[], "p").await;
        assert!(outcome.lines.is_empty());
        assert!(outcome.warning.is_none());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_max_retries_saturates() {
        let backend = ScriptedBackend::echo("T:");

        let outcome = translator(&backend, u32::MAX).translate(&lines(&["a"]), "p").await;

        assert_eq!(outcome.lines, vec!["T:a"]);
        assert!(outcome.warning.is_none());
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_multiline_error_body_stays_on_one_line() {
        let backend = ScriptedBackend::new(Step::Fail(CompletionError::Api {
            status: 502,
            body: "<html>\r\n\r\n<body>Bad Gateway</body>\n</html>".into(),
        }));

        let outcome = translator(&backend, 0).translate(&lines(&["a"]), "p").await;

        let warning = outcome.warning.clone().unwrap();
        assert!(!warning.contains('\n') && !warning.contains('\r'));
        assert!(warning.contains("<html> <body>Bad Gateway</body> </html>"));
        assert!(!outcome.lines[0].contains('\n'));
        assert!(outcome.lines[0].ends_with("\\N[untranslated] a"));
    }

    #[test]
    fn test_long_warning_is_capped() {
        let outcome = failure_output(&lines(&["a"]), &"x".repeat(1000), None);
        let warning = outcome.warning.unwrap();
        assert_eq!(warning.chars().count(), MAX_INLINE_WARNING_CHARS + 1);
        assert!(warning.ends_with('…'));
    }

    #[test]
    fn test_failure_output_empty_batch() {
        let outcome = failure_output(&[], "warn", None);
        assert!(outcome.lines.is_empty());
        assert_eq!(outcome.warning.as_deref(), Some("warn"));
    }
}
