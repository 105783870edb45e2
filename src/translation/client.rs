use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;
use tracing::debug;

use crate::error::CompletionError;

/// A single chat-completion round trip: one system and one user message.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub system: &'a str,
    pub user: &'a str,
}

/// Anything that can answer a chat-completion request with plain text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(api_base: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_base,
            api_key: api_key.filter(|key| !key.is_empty()),
        }
    }

    /// Builds a client whose requests give up after `timeout`.
    pub fn with_timeout(
        api_base: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_base,
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    /// Builds a client with an optional per-request timeout.
    pub fn connect(
        api_base: String,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, CompletionError> {
        match timeout {
            Some(timeout) => Self::with_timeout(api_base, api_key, timeout),
            None => Ok(Self::new(api_base, api_key)),
        }
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String, CompletionError> {
        let url = self.url();

        let body = ChatCompletionRequest {
            model: request.model,
            temperature: request.temperature,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Borrowed(request.system),
                },
                Message {
                    role: "user",
                    content: Cow::Borrowed(request.user),
                },
            ],
            stream: false,
        };

        let mut http_request = self.client.post(&url).json(&body);

        if let Some(api_key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        debug!(model = request.model, %url, "sending chat completion");

        let response = http_request
            .send()
            .await
            .map_err(|e| CompletionError::Request(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, request.model, body));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                CompletionError::MalformedResponse("response contained no message content".into())
            })
    }
}

fn classify_status(status: StatusCode, model: &str, body: String) -> CompletionError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Authentication(body),
        StatusCode::NOT_FOUND => CompletionError::UnknownModel(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited(body),
        _ => CompletionError::Api {
            status: status.as_u16(),
            body,
        },
    }
}
