use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::job::{DEFAULT_MAX_RETRIES, DEFAULT_TEMPERATURE, DEFAULT_WINDOW_SIZE};

#[derive(Parser, Debug)]
#[command(name = "subtl")]
#[command(about = "Translate subtitle files line by line with an OpenAI-compatible model")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    /// Subtitle file to translate (.srt, .ass, .ssa)
    pub input: Option<PathBuf>,

    /// Output path (default: input name with a target-language suffix)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Lines sent per request
    #[arg(short = 'w', long, default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: usize,

    /// Sampling temperature for translation requests
    #[arg(short = 'T', long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Extra attempts per window when the reply is incomplete
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub retries: u32,

    /// Source language name
    #[arg(long = "from")]
    pub from: Option<String>,

    /// Target language name
    #[arg(short = 't', long = "to")]
    pub to: Option<String>,

    /// Summarize the whole file first and translate with that summary
    #[arg(short = 'd', long)]
    pub deep_context: bool,

    /// Topic hint for the prompt, e.g. "medical drama"
    #[arg(short = 'c', long = "context")]
    pub context: Option<String>,

    /// Translation model
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Summary model used with --deep-context
    #[arg(long)]
    pub summary_model: Option<String>,

    #[command(flatten)]
    pub api: ApiArgs,

    /// Per-request timeout in seconds (no timeout by default)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Verbose logging (RUST_LOG takes precedence)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Endpoint overrides shared by commands that talk to the API.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// API base URL, e.g. https://api.openai.com/v1
    #[arg(long)]
    pub api_base: Option<String>,

    /// API key (prefer the config file or api_key_env)
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a short test prompt to verify the endpoint, key and model
    Check {
        /// Test the summary model instead of the translation model
        #[arg(short = 'd', long)]
        deep_context: bool,

        /// Model to test
        #[arg(short = 'm', long)]
        model: Option<String>,

        #[command(flatten)]
        api: ApiArgs,

        /// Per-request timeout in seconds (no timeout by default)
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
    /// Show line count and window split for a subtitle file
    Stats {
        /// Subtitle file to inspect
        input: PathBuf,

        /// Lines sent per request
        #[arg(short = 'w', long, default_value_t = DEFAULT_WINDOW_SIZE)]
        window_size: usize,
    },
    /// Configure subtl settings
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// List common target language names
    Languages,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["subtl", "ep01.srt"]);
        assert_eq!(args.input, Some(PathBuf::from("ep01.srt")));
        assert_eq!(args.window_size, 10);
        assert!((args.temperature - 1.3).abs() < f32::EPSILON);
        assert_eq!(args.retries, 1);
        assert!(!args.deep_context);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_translate_flags() {
        let args = Args::parse_from([
            "subtl", "ep01.ass", "-w", "5", "-T", "0.7", "-r", "3", "--from", "Japanese", "--to",
            "German", "-c", "cooking show", "--api-base", "http://localhost:8080/v1",
            "--timeout", "30",
        ]);
        assert_eq!(args.window_size, 5);
        assert_eq!(args.retries, 3);
        assert_eq!(args.from.as_deref(), Some("Japanese"));
        assert_eq!(args.to.as_deref(), Some("German"));
        assert_eq!(args.context.as_deref(), Some("cooking show"));
        assert_eq!(args.api.api_base.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(args.timeout, Some(30));
    }

    #[test]
    fn test_subcommands() {
        let args = Args::parse_from(["subtl", "check", "--deep-context"]);
        assert!(matches!(
            args.command,
            Some(Command::Check {
                deep_context: true,
                ..
            })
        ));

        let args = Args::parse_from(["subtl", "check", "--timeout", "5"]);
        assert!(matches!(
            args.command,
            Some(Command::Check {
                timeout: Some(5),
                ..
            })
        ));

        let args = Args::parse_from(["subtl", "stats", "a.srt", "-w", "4"]);
        assert!(matches!(
            args.command,
            Some(Command::Stats { window_size: 4, .. })
        ));
    }
}
