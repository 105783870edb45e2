//! Endpoint check: one short request to confirm key, endpoint and model.

use anyhow::{Result, bail};
use std::time::Duration;

use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::error::CompletionError;
use crate::translation::{ChatBackend, ChatRequest, OpenAiClient};
use crate::ui::{Spinner, Style};

const CHECK_SYSTEM_PROMPT: &str = "You are a test assistant. This is a simple connectivity test.";
const CHECK_USER_PROMPT: &str = "Reply with \"Hello, world!\" and nothing else.";
const CHECK_TEMPERATURE: f32 = 0.1;

pub struct CheckOptions {
    /// Test the summary model instead of the translation model.
    pub deep_context: bool,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout: Option<u64>,
}

pub async fn run_check(options: CheckOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default();

    let (translation_model, summary_model) = if options.deep_context {
        (None, options.model)
    } else {
        (options.model, None)
    };
    let config = resolve_config(
        &ResolveOptions {
            api_base: options.api_base,
            api_key: options.api_key,
            translation_model,
            summary_model,
            deep_context: options.deep_context,
            ..ResolveOptions::default()
        },
        &config_file,
    )?;

    let (label, model) = if options.deep_context {
        ("summary model", config.summary_model.as_str())
    } else {
        ("translation model", config.translation_model.as_str())
    };

    println!(
        "{} {label} {} at {}",
        Style::header("Checking"),
        Style::value(model),
        Style::secondary(&config.api_base)
    );

    let client = OpenAiClient::connect(
        config.api_base.clone(),
        Some(config.api_key.clone()),
        options.timeout.map(Duration::from_secs),
    )?;
    let spinner = Spinner::new("Waiting for reply...");
    let result = check_backend(&client, model).await;
    spinner.stop();

    match result {
        Ok(reply) => {
            println!(
                "{} Connected. The {label} replied: {}",
                Style::success("✓"),
                Style::value(format!("\"{reply}\""))
            );
            Ok(())
        }
        Err(e) => bail!("{}", describe_failure(&e, label, model)),
    }
}

/// Sends the fixed test prompt and returns the trimmed reply.
pub async fn check_backend<B: ChatBackend + ?Sized>(
    backend: &B,
    model: &str,
) -> Result<String, CompletionError> {
    let reply = backend
        .complete(ChatRequest {
            model,
            temperature: CHECK_TEMPERATURE,
            system: CHECK_SYSTEM_PROMPT,
            user: CHECK_USER_PROMPT,
        })
        .await?;
    Ok(reply.trim().to_string())
}

fn describe_failure(err: &CompletionError, label: &str, model: &str) -> String {
    match err {
        CompletionError::Authentication(_) => "API key invalid\n\n\
             Check the key with 'subtl configure --show' or pass --api-key."
            .to_string(),
        CompletionError::UnknownModel(_) => format!(
            "The {label} '{model}' is invalid or missing on this endpoint\n\n\
             Pass --model <name> or run 'subtl configure'."
        ),
        CompletionError::Request(message) => {
            format!("Could not reach the API: {message}\n\nCheck api_base and your network.")
        }
        other => format!("API check failed: {other}"),
    }
}
