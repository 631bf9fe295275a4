//! CLI command definitions

use clap::{Parser, ValueEnum};
use colloquy_domain::{ErrorStrategy, OutputFormat};
use std::path::PathBuf;

/// Output format for the finished transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// `Name: response` blocks
    Text,
    /// One section per turn
    Markdown,
    /// Pretty-printed JSON document
    Json,
    /// Standalone HTML page
    Html,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Markdown => OutputFormat::Markdown,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Html => OutputFormat::Html,
        }
    }
}

/// What to do when a provider call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Retry with exponential backoff
    Retry,
    /// Retry once on the fallback provider
    Fallback,
    /// Stop the conversation
    Abort,
    /// Record a placeholder turn and carry on
    Continue,
}

impl From<StrategyArg> for ErrorStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Retry => ErrorStrategy::Retry,
            StrategyArg::Fallback => ErrorStrategy::Fallback,
            StrategyArg::Abort => ErrorStrategy::Abort,
            StrategyArg::Continue => ErrorStrategy::Continue,
        }
    }
}

/// CLI arguments for colloquy
#[derive(Parser, Debug)]
#[command(name = "colloquy")]
#[command(author, version, about = "Turn-based dialogue between LLM characters")]
#[command(long_about = r#"
Colloquy lets two or more LLM-backed characters talk about a topic, one turn
at a time. Every prompt restates the topic and replays the conversation so far.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./colloquy.toml     Project-level config (or ./.colloquy.toml)
3. ~/.config/colloquy/config.toml   Global config

Example:
  colloquy --topic "Is a hot dog a sandwich?" --turns 8
  colloquy --config debate.toml -o markdown --save debate.md
  colloquy --strategy fallback --fallback-provider anthropic
"#)]
pub struct Cli {
    /// Topic of the conversation (overrides the config file)
    #[arg(short, long, value_name = "TOPIC")]
    pub topic: Option<String>,

    /// Number of turns to run
    #[arg(short = 'n', long, value_name = "N")]
    pub turns: Option<u32>,

    /// Speaker id that opens the conversation
    #[arg(long, value_name = "ID")]
    pub first_speaker: Option<String>,

    /// Pause between turns in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Error handling strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Total attempts per turn under the retry strategy
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Provider kind used by the fallback strategy
    #[arg(long, value_name = "KIND")]
    pub fallback_provider: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormatArg>,

    /// Save the rendered transcript to this file
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Append conversation events as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators and console transcript
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the merged config, then exit
    #[arg(long)]
    pub show_config: bool,
}
