#![allow(clippy::unwrap_used)]
//! Config priority contract tests.
//!
//! Priority order (highest to lowest):
//! 1. CLI arguments
//! 2. Config file values
//! 3. Built-in defaults

use serial_test::serial;
use subtl::config::{
    ConfigFile, DEFAULT_API_BASE, DEFAULT_SUMMARY_MODEL, DEFAULT_TRANSLATION_MODEL,
    ResolveOptions, resolve_config,
};

fn file_with_values() -> ConfigFile {
    ConfigFile {
        api_base: "http://file.local/v1".to_string(),
        api_key: "file_key".to_string(),
        api_key_env: None,
        translation_model: "file-translate".to_string(),
        summary_model: "file-summary".to_string(),
        source_language: "Japanese".to_string(),
        target_language: "German".to_string(),
    }
}

#[test]
fn test_cli_overrides_every_file_value() {
    let options = ResolveOptions {
        api_base: Some("http://cli.local/v1".to_string()),
        api_key: Some("cli_key".to_string()),
        translation_model: Some("cli-translate".to_string()),
        summary_model: Some("cli-summary".to_string()),
        source_language: Some("Korean".to_string()),
        target_language: Some("Italian".to_string()),
        deep_context: true,
    };

    let resolved = resolve_config(&options, &file_with_values()).unwrap();

    assert_eq!(resolved.api_base, "http://cli.local/v1");
    assert_eq!(resolved.api_key, "cli_key");
    assert_eq!(resolved.translation_model, "cli-translate");
    assert_eq!(resolved.summary_model, "cli-summary");
    assert_eq!(resolved.source_language, "Korean");
    assert_eq!(resolved.target_language, "Italian");
}

#[test]
fn test_file_values_used_without_cli() {
    let resolved = resolve_config(&ResolveOptions::default(), &file_with_values()).unwrap();

    assert_eq!(resolved.api_base, "http://file.local/v1");
    assert_eq!(resolved.api_key, "file_key");
    assert_eq!(resolved.translation_model, "file-translate");
    assert_eq!(resolved.target_language, "German");
}

#[test]
fn test_builtin_defaults_fill_missing_keys() {
    let file: ConfigFile = toml::from_str("api_key = \"only_key\"").unwrap();
    let resolved = resolve_config(&ResolveOptions::default(), &file).unwrap();

    assert_eq!(resolved.api_base, DEFAULT_API_BASE);
    assert_eq!(resolved.translation_model, DEFAULT_TRANSLATION_MODEL);
    assert_eq!(resolved.summary_model, DEFAULT_SUMMARY_MODEL);
    assert_eq!(resolved.source_language, "English");
    assert_eq!(resolved.target_language, "Simplified Chinese");
}

#[test]
fn test_cli_values_are_trimmed() {
    let options = ResolveOptions {
        target_language: Some("  French \n".to_string()),
        ..ResolveOptions::default()
    };
    let resolved = resolve_config(&options, &file_with_values()).unwrap();
    assert_eq!(resolved.target_language, "French");
}

#[test]
#[serial]
fn test_env_key_beats_file_key_but_not_cli_key() {
    let mut file = file_with_values();
    file.api_key_env = Some("SUBTL_PRIORITY_TEST_KEY".to_string());
    unsafe { std::env::set_var("SUBTL_PRIORITY_TEST_KEY", "env_key") };

    let resolved = resolve_config(&ResolveOptions::default(), &file).unwrap();
    assert_eq!(resolved.api_key, "env_key");

    let options = ResolveOptions {
        api_key: Some("cli_key".to_string()),
        ..ResolveOptions::default()
    };
    let resolved = resolve_config(&options, &file).unwrap();
    assert_eq!(resolved.api_key, "cli_key");

    unsafe { std::env::remove_var("SUBTL_PRIORITY_TEST_KEY") };
}

#[test]
fn test_missing_key_everywhere_is_an_error() {
    let mut file = file_with_values();
    file.api_key = String::new();

    let err = resolve_config(&ResolveOptions::default(), &file).unwrap_err();
    assert!(err.to_string().contains("'api_key'"));
    assert!(err.to_string().contains("--api-key"));
}
