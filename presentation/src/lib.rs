//! Presentation layer for colloquy
//!
//! This crate contains the CLI definition, transcript formatters and
//! progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormatArg, StrategyArg};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{TranscriptFormatter, TranscriptView, formatter_for, render};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
