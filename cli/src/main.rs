//! CLI entrypoint for colloquy
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use colloquy_application::{
    ConversationProgress, NoProgress, RunConversationError, RunConversationInput, RunConversationUseCase,
};
use colloquy_domain::{ConversationStatus, ErrorStrategy, OutputFormat, SpeakerRoster, Transcript};
use colloquy_infrastructure::{
    ConfigLoader, ConversationConfig, FileConfig, JsonlConversationLogger, TranscriptStore,
    builtin_registry,
};
use colloquy_presentation::{
    Cli, ConsoleFormatter, ProgressReporter, SimpleProgress, TranscriptView, render,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _log_guard = init_tracing(&cli)?;

    if cli.show_config {
        show_config(&cli)?;
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let mut loaded = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    apply_overrides(&mut loaded.file, &cli);
    let config = loaded
        .file
        .resolve(&loaded.base_dir)
        .context("Invalid conversation configuration")?;

    info!(
        topic = %config.settings.topic,
        turns = config.settings.num_turns,
        strategy = %config.policy.strategy,
        "Starting colloquy"
    );

    // === Dependency Injection ===
    let registry = Arc::new(builtin_registry(config.providers.clone())?);

    let cancellation = CancellationToken::new();
    spawn_ctrl_c_handler(cancellation.clone());

    let mut use_case = RunConversationUseCase::new(registry, config.policy.clone())
        .with_cancellation(cancellation);
    if let Some(path) = &config.output.event_log {
        let logger = JsonlConversationLogger::open(path)
            .with_context(|| format!("Failed to open event log {}", path.display()))?;
        use_case = use_case.with_conversation_logger(Arc::new(logger));
    }

    let ConversationConfig {
        roster,
        settings,
        output,
        ..
    } = config;
    let topic = settings.topic.clone();
    let input = RunConversationInput::new(roster.clone(), settings);

    // Execute with or without progress reporting
    let progress: Box<dyn ConversationProgress> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };
    let result = use_case
        .execute_with_progress(input, progress.as_ref())
        .await;

    let (transcript, status, failure) = match result {
        Ok(output) => (output.transcript, output.status, None),
        Err(err) => {
            let status = err.status();
            match (status, err.partial_transcript().cloned()) {
                (Some(status), Some(transcript)) => (transcript, status, Some(err)),
                // Nothing ran; there is no transcript to show
                _ => return Err(err.into()),
            }
        }
    };

    // === Output ===
    let format = output.effective_format();
    let view = TranscriptView::new(&topic, &roster, &transcript, status);

    if output.display_in_console && !cli.quiet {
        match format {
            OutputFormat::Text => println!("{}", ConsoleFormatter::format(&view)),
            other => println!("{}", render(other, &view)),
        }
    }
    if let Some(path) = &output.save_path {
        let saved = save_transcript(path, format, &view)?;
        if !cli.quiet {
            println!("Conversation saved to {}", saved.display());
        }
    }

    match failure {
        None => Ok(ExitCode::SUCCESS),
        Some(err) => {
            report_failure(&err, &roster, &transcript);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Initialize logging based on verbosity level
///
/// `RUST_LOG` wins over `-v` when set. The returned guard must live until
/// exit so buffered file output is flushed.
fn init_tracing(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match &cli.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// CLI flags win over every configuration file
fn apply_overrides(file: &mut FileConfig, cli: &Cli) {
    let conversation = &mut file.conversation;
    if let Some(topic) = &cli.topic {
        conversation.topic = Some(topic.clone());
    }
    if let Some(turns) = cli.turns {
        conversation.num_turns = turns;
    }
    if let Some(first) = &cli.first_speaker {
        conversation.first_speaker = Some(first.clone());
    }
    if let Some(delay) = cli.delay_ms {
        conversation.delay_between_turns_ms = delay;
    }

    let policy = &mut file.error_handling;
    if let Some(strategy) = cli.strategy {
        policy.strategy = ErrorStrategy::from(strategy).as_str().to_string();
    }
    if let Some(max) = cli.max_retries {
        policy.max_retries = max;
    }
    if let Some(kind) = &cli.fallback_provider {
        policy.fallback_provider = Some(kind.clone());
    }

    let output = &mut file.output;
    if let Some(format) = cli.output {
        output.format = Some(OutputFormat::from(format));
    }
    if let Some(path) = &cli.save {
        output.save_path = Some(path.clone());
    }
    if let Some(path) = &cli.event_log {
        output.event_log = Some(path.clone());
    }
}

fn show_config(cli: &Cli) -> Result<()> {
    println!("Configuration sources (highest priority first):");
    for source in ConfigLoader::sources(cli.config.as_deref()) {
        let location = source
            .path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(unavailable)".to_string());
        let marker = if source.found { "found" } else { "not found" };
        println!("  {:<9} {} [{}]", source.label, location, marker);
    }
    println!();

    let loaded = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    let mut file = loaded.file;
    apply_overrides(&mut file, cli);

    println!("Character base directory: {}", loaded.base_dir.display());
    println!();
    println!("{}", toml::to_string_pretty(&file.redacted())?);
    Ok(())
}

/// A save path naming an existing directory (or ending in a separator)
/// receives a timestamped file
fn save_transcript(path: &Path, format: OutputFormat, view: &TranscriptView<'_>) -> Result<PathBuf> {
    let is_dir = path.is_dir() || path.as_os_str().to_string_lossy().ends_with(std::path::is_separator);
    let store = if is_dir {
        TranscriptStore::timestamped(path, format, Utc::now())
    } else {
        TranscriptStore::new(path)
    };

    let saved = store
        .save(&render(format, view))
        .with_context(|| format!("Failed to save conversation to {}", store.path().display()))?;
    Ok(saved.to_path_buf())
}

fn spawn_ctrl_c_handler(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, stopping after the current step");
                token.cancel();
            }
            Err(err) => warn!(error = %err, "Could not install Ctrl-C handler"),
        }
    });
}

fn report_failure(err: &RunConversationError, roster: &SpeakerRoster, transcript: &Transcript) {
    let completed = transcript.len();
    match err.status() {
        Some(ConversationStatus::Cancelled) => {
            eprintln!("Conversation cancelled after {} turns", completed);
        }
        _ => {
            eprintln!("Error: {}", err);
            let mut source = std::error::Error::source(err);
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            if let Some(last) = transcript.last() {
                eprintln!(
                    "Last completed turn: {} by {}",
                    last.turn_number(),
                    roster.display_name(last.speaker_id())
                );
            }
        }
    }
}
