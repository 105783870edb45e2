//! Persisted settings and their resolution against CLI overrides.

mod manager;

pub use manager::{
    ConfigFile, ConfigManager, DEFAULT_API_BASE, DEFAULT_SOURCE_LANGUAGE, DEFAULT_SUMMARY_MODEL,
    DEFAULT_TARGET_LANGUAGE, DEFAULT_TRANSLATION_MODEL, ResolveOptions, ResolvedConfig,
    resolve_config,
};
