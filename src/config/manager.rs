use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::paths;
use crate::ui::Style;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TRANSLATION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SUMMARY_MODEL: &str = "gpt-4o";
pub const DEFAULT_SOURCE_LANGUAGE: &str = "English";
pub const DEFAULT_TARGET_LANGUAGE: &str = "Simplified Chinese";

/// The persisted settings, stored in `config.toml`.
///
/// Missing keys fall back to the built-in defaults. The API key is kept in
/// clear text; `api_key_env` names an environment variable that overrides it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Base URL of the OpenAI-compatible API, including the version path.
    pub api_base: String,
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Model used for line-by-line translation.
    pub translation_model: String,
    /// Model used for the deep-context summary.
    pub summary_model: String,
    pub source_language: String,
    pub target_language: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            api_key_env: None,
            translation_model: DEFAULT_TRANSLATION_MODEL.to_string(),
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }
}

impl ConfigFile {
    /// Gets the API key, preferring the environment variable over the file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        Some(self.api_key.trim().to_string()).filter(|key| !key.is_empty())
    }

    /// Returns a copy with the CLI overrides applied.
    pub fn merged(&self, options: &ResolveOptions) -> Self {
        let pick = |cli: &Option<String>, file: &str| {
            cli.as_deref().unwrap_or(file).trim().to_string()
        };

        Self {
            api_base: pick(&options.api_base, &self.api_base),
            api_key: pick(&options.api_key, &self.api_key),
            api_key_env: self.api_key_env.clone(),
            translation_model: pick(&options.translation_model, &self.translation_model),
            summary_model: pick(&options.summary_model, &self.summary_model),
            source_language: pick(&options.source_language, &self.source_language),
            target_language: pick(&options.target_language, &self.target_language),
        }
    }
}

/// Settings ready for a job, after merging and validation.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_base: String,
    pub api_key: String,
    pub translation_model: String,
    pub summary_model: String,
    pub source_language: String,
    pub target_language: String,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub translation_model: Option<String>,
    pub summary_model: Option<String>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    /// The summary model is only required when deep context is on.
    pub deep_context: bool,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// # Errors
///
/// Returns an error if the API key, translation model, either language, or
/// (with deep context) the summary model is empty.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let merged = config_file.merged(options);

    let api_base = if merged.api_base.is_empty() {
        eprintln!(
            "{} API base URL is empty, using {}\n",
            Style::warning("Warning:"),
            DEFAULT_API_BASE
        );
        DEFAULT_API_BASE.to_string()
    } else {
        merged.api_base.clone()
    };

    let cli_key = options
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from);
    let Some(api_key) = cli_key.or_else(|| merged.get_api_key()) else {
        bail!(
            "Missing required configuration: 'api_key'\n\n\
             Please provide it via:\n  \
             - CLI option: subtl --api-key <key> <file>\n  \
             - Config file: run 'subtl configure'"
        );
    };

    require(&merged.translation_model, "translation_model", "--model <name>")?;
    require(&merged.source_language, "source_language", "--from <language>")?;
    require(&merged.target_language, "target_language", "--to <language>")?;
    if options.deep_context {
        require(&merged.summary_model, "summary_model", "--summary-model <name>")
            .context("Deep context is enabled, so a summary model is required")?;
    }

    Ok(ResolvedConfig {
        api_base,
        api_key,
        translation_model: merged.translation_model,
        summary_model: merged.summary_model,
        source_language: merged.source_language,
        target_language: merged.target_language,
    })
}

fn require(value: &str, key: &str, flag: &str) -> Result<()> {
    if value.is_empty() {
        bail!(
            "Missing required configuration: '{key}'\n\n\
             Please provide it via:\n  \
             - CLI option: subtl {flag} <file>\n  \
             - Config file: run 'subtl configure'"
        );
    }
    Ok(())
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/subtl/config.toml`
    /// or `~/.config/subtl/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    /// Manager for an explicit file, bypassing the XDG lookup.
    pub const fn at(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        crate::fs::atomic_write(&self.config_path, &contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the file, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(&self) -> ConfigFile {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                if self.config_path.exists() {
                    tracing::warn!(error = %e, "ignoring unreadable config file");
                }
                ConfigFile::default()
            }
        }
    }
}
