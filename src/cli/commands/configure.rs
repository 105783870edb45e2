//! Configure command handler for editing persisted settings.

use anyhow::{Result, bail};
use inquire::{Password, PasswordDisplayMode, Text};

use crate::config::{ConfigFile, ConfigManager};
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the configure command: `--show` prints, otherwise prompts for each key.
pub fn run_configure(show: bool) -> Result<()> {
    let manager = ConfigManager::new()?;
    if show {
        print_settings(&manager.load_or_default(), &manager);
        return Ok(());
    }
    handle_prompt_cancellation(|| run_configure_inner(&manager))
}

fn run_configure_inner(manager: &ConfigManager) -> Result<()> {
    let current = manager.load_or_default();
    print_settings(&current, manager);

    let api_base = prompt_text("API base URL:", &current.api_base, None)?;

    let api_key = Password::new("API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    let api_key = if api_key.trim().is_empty() {
        current.api_key.clone()
    } else {
        api_key.trim().to_string()
    };

    let api_key_env = prompt_text(
        "API key environment variable:",
        current.api_key_env.as_deref().unwrap_or(""),
        Some("Optional; when set and non-empty it overrides the stored key"),
    )?;

    let translation_model = prompt_required("Translation model:", &current.translation_model)?;
    let summary_model = prompt_required("Summary model:", &current.summary_model)?;
    let source_language = prompt_required("Source language:", &current.source_language)?;
    let target_language = prompt_required("Target language:", &current.target_language)?;

    let config = ConfigFile {
        api_base,
        api_key,
        api_key_env: Some(api_key_env).filter(|name| !name.is_empty()),
        translation_model,
        summary_model,
        source_language,
        target_language,
    };
    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display())
    );
    if !config.api_key.is_empty() {
        println!(
            "  {}",
            Style::hint("The API key is stored in clear text in this file.")
        );
    }

    Ok(())
}

fn prompt_text(message: &str, default: &str, help: Option<&str>) -> Result<String> {
    let mut prompt = Text::new(message).with_default(default);
    if let Some(help) = help {
        prompt = prompt.with_help_message(help);
    }
    Ok(prompt.prompt()?.trim().to_string())
}

fn prompt_required(message: &str, default: &str) -> Result<String> {
    let value = prompt_text(message, default, None)?;
    if value.is_empty() {
        bail!("{} cannot be empty", message.trim_end_matches(':'));
    }
    Ok(value)
}

fn print_settings(config: &ConfigFile, manager: &ConfigManager) {
    println!(
        "{} {}",
        Style::header("Configuration"),
        Style::secondary(manager.config_path().display())
    );
    let rows = [
        ("api_base", or_not_set(&config.api_base)),
        ("api_key", mask_key(&config.api_key)),
        (
            "api_key_env",
            or_not_set(config.api_key_env.as_deref().unwrap_or("")),
        ),
        ("translation_model", or_not_set(&config.translation_model)),
        ("summary_model", or_not_set(&config.summary_model)),
        ("source_language", or_not_set(&config.source_language)),
        ("target_language", or_not_set(&config.target_language)),
    ];
    for (key, value) in rows {
        println!("  {} {value}", Style::label(format!("{key:<19}")));
    }
    println!();
}

fn or_not_set(value: &str) -> String {
    if value.is_empty() {
        Style::secondary("(not set)")
    } else {
        Style::value(value)
    }
}

/// Shows only the last four characters of a key.
fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return Style::secondary("(not set)");
    }
    let chars: Vec<char> = key.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    Style::value(format!("****{tail}"))
}
