//! # subtl - Subtitle Translation CLI
//!
//! `subtl` translates subtitle files line by line through any
//! OpenAI-compatible chat-completion endpoint.
//!
//! Lines are sent in fixed-size windows as a numbered list and the reply is
//! matched back by number, so the output always has exactly one line per
//! input line. Windows that cannot be translated keep their source text,
//! tagged, and the job carries on.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate into the configured target language
//! subtl ./episode01.srt
//!
//! # Override languages and window size
//! subtl --from Japanese --to English -w 20 ./episode01.ass
//!
//! # Summarize first and translate with that context
//! subtl --deep-context ./episode01.srt
//!
//! # Verify endpoint, key and model
//! subtl check
//! ```
//!
//! Pressing Ctrl+C stops after the current window and saves what was
//! translated to `<output>_partial.<ext>`.
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/subtl/config.toml`:
//!
//! ```toml
//! api_base = "https://api.openai.com/v1"
//! api_key = ""
//! api_key_env = "OPENAI_API_KEY"
//! translation_model = "gpt-4o-mini"
//! summary_model = "gpt-4o"
//! source_language = "English"
//! target_language = "Simplified Chinese"
//! ```

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management.
pub mod config;

/// Error types for the model client, subtitle files and jobs.
pub mod error;

/// File system utilities.
pub mod fs;

/// Translation jobs: orchestration, cancellation, events and control.
pub mod job;

/// XDG-style config path and output path derivation.
pub mod paths;

/// SRT and ASS/SSA subtitle loading and saving.
pub mod subtitle;

/// Line codec, batch translation and summaries over a chat backend.
pub mod translation;

/// Terminal UI components (progress bar, spinner, colors).
pub mod ui;
