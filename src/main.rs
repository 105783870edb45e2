use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use subtl::cli::commands::{check, configure, stats, translate};
use subtl::cli::{Args, Command};
use subtl::translation::print_languages;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Some(Command::Languages) => {
            print_languages();
        }
        Some(Command::Configure { show }) => {
            configure::run_configure(show)?;
        }
        Some(Command::Stats { input, window_size }) => {
            stats::run_stats(&input, window_size)?;
        }
        Some(Command::Check {
            deep_context,
            model,
            api,
            timeout,
        }) => {
            let options = check::CheckOptions {
                deep_context,
                model,
                api_base: api.api_base,
                api_key: api.api_key,
                timeout,
            };
            check::run_check(options).await?;
        }
        None => {
            let Some(input) = args.input else {
                Args::command().print_help()?;
                return Ok(());
            };

            let options = translate::TranslateOptions {
                input,
                output: args.output,
                window_size: args.window_size,
                temperature: args.temperature,
                retries: args.retries,
                from: args.from,
                to: args.to,
                deep_context: args.deep_context,
                context: args.context,
                model: args.model,
                summary_model: args.summary_model,
                api_base: args.api.api_base,
                api_key: args.api.api_key,
                timeout: args.timeout,
                verbose: args.verbose,
            };
            translate::run_translate(options).await?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` for this crate with `-v`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,subtl=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
