use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::job::{JobController, JobEvent, JobOutcome, JobRequest, Orchestrator};
use crate::translation::OpenAiClient;
use crate::ui::{JobProgress, Style};

pub struct TranslateOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub window_size: usize,
    pub temperature: f32,
    pub retries: u32,
    pub from: Option<String>,
    pub to: Option<String>,
    pub deep_context: bool,
    pub context: Option<String>,
    pub model: Option<String>,
    pub summary_model: Option<String>,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<u64>,
    /// Print source/translation pairs for every finished window.
    pub verbose: bool,
}

pub async fn run_translate(options: TranslateOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default();

    let resolve_options = ResolveOptions {
        api_base: options.api_base.clone(),
        api_key: options.api_key.clone(),
        translation_model: options.model.clone(),
        summary_model: options.summary_model.clone(),
        source_language: options.from.clone(),
        target_language: options.to.clone(),
        deep_context: options.deep_context,
    };
    let config = resolve_config(&resolve_options, &config_file)?;

    if !options.input.exists() {
        bail!(
            "Input file not found: {}\n\n\
             Check the path, or run 'subtl stats <file>' to inspect a subtitle file.",
            options.input.display()
        );
    }

    let request = JobRequest {
        input_path: options.input,
        output_path: options.output,
        window_size: options.window_size,
        temperature: options.temperature,
        max_retries: options.retries,
        source_language: config.source_language.clone(),
        target_language: config.target_language.clone(),
        deep_context: options.deep_context,
        context_hint: options.context.filter(|hint| !hint.trim().is_empty()),
        translation_model: config.translation_model.clone(),
        summary_model: config.summary_model.clone(),
    };
    request.validate()?;

    // Keys given on the command line stay off disk.
    let mut persisted = config_file.merged(&resolve_options);
    persisted.api_key = config_file.api_key.clone();
    if persisted != config_file
        && let Err(e) = manager.save(&persisted)
    {
        warn!(error = %e, "could not save settings");
    }

    let client = OpenAiClient::connect(
        config.api_base.clone(),
        Some(config.api_key.clone()),
        options.timeout.map(Duration::from_secs),
    )?;

    println!(
        "{} {} {} {}",
        Style::header("Translating"),
        Style::value(request.input_path.display()),
        Style::secondary("→"),
        Style::value(request.resolved_output_path().display())
    );
    println!(
        "  {} {} → {}  {} {}  {} {}",
        Style::label("languages"),
        config.source_language,
        config.target_language,
        Style::label("model"),
        config.translation_model,
        Style::label("window"),
        request.window_size
    );

    let controller = JobController::new(Orchestrator::new(Arc::new(client)));
    let mut handle = controller.start(request)?;
    let progress = JobProgress::new();

    let mut ctrl_c = pin!(tokio::signal::ctrl_c());
    let mut stop_requested = false;
    let mut signals = true;

    loop {
        tokio::select! {
            event = handle.events.recv() => match event {
                Some(event) => render_event(&progress, event, options.verbose),
                None => break,
            },
            signal = &mut ctrl_c, if signals => match signal.map(|()| interrupt_action(stop_requested)) {
                Err(e) => {
                    warn!(error = %e, "cannot listen for Ctrl+C");
                    signals = false;
                }
                Ok(Interrupt::Stop) => {
                    stop_requested = true;
                    controller.stop();
                    progress.set_status(STOP_STATUS);
                    ctrl_c.set(tokio::signal::ctrl_c());
                }
                Ok(Interrupt::Abort) => {
                    handle.abort().await;
                    progress.finish();
                    bail!("Interrupted, partial result not saved");
                }
            },
        }
    }

    let result = handle.wait().await;
    progress.finish();
    let outcome = result.context("Translation failed")?;

    print_outcome(&outcome);
    Ok(())
}

const STOP_STATUS: &str = "Stop requested, waiting for current batch (Ctrl+C again to quit)...";

/// What a Ctrl+C does at this point of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    /// Finish the current window, then save the partial result.
    Stop,
    /// Quit now without saving.
    Abort,
}

const fn interrupt_action(stop_requested: bool) -> Interrupt {
    if stop_requested {
        Interrupt::Abort
    } else {
        Interrupt::Stop
    }
}

fn render_event(progress: &JobProgress, event: JobEvent, verbose: bool) {
    match event {
        JobEvent::Status(status) => progress.set_status(&status),
        JobEvent::Progress { done, total } => progress.set_progress(done, total),
        JobEvent::Eta(eta) => progress.set_eta(eta),
        JobEvent::Summary(summary) => {
            progress.println(format!("{} {summary}", Style::header("Summary:")));
        }
        JobEvent::BatchWarning { lines, message } => {
            progress.println(format!(
                "{} lines {}-{}: {message}",
                Style::warning("Warning:"),
                lines.start + 1,
                lines.end
            ));
        }
        JobEvent::BatchPreview { source, translated } if verbose => {
            for (src, dst) in source.iter().zip(&translated) {
                progress.println(format!(
                    "  {} {} {}",
                    Style::source(src),
                    Style::secondary("→"),
                    Style::translated(dst)
                ));
            }
        }
        JobEvent::BatchPreview { .. } => {}
    }
}

fn print_outcome(outcome: &JobOutcome) {
    match outcome {
        JobOutcome::Completed {
            output_path,
            lines,
            warnings,
        } => {
            println!(
                "{} Translated {lines} lines to {}",
                Style::success("✓"),
                Style::value(output_path.display())
            );
            if *warnings > 0 {
                println!(
                    "  {}",
                    Style::warning(format!(
                        "{warnings} window(s) kept source text, search the output for [untranslated]"
                    ))
                );
            }
        }
        JobOutcome::PartiallyCompleted {
            output_path,
            translated,
            total,
            ..
        } => {
            println!(
                "{} Stopped after {translated} of {total} lines. Partial result saved to {}",
                Style::warning("■"),
                Style::value(output_path.display())
            );
        }
    }
}
