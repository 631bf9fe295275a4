//! Infrastructure layer for colloquy
//!
//! Adapters for the application ports: HTTP providers, configuration file
//! loading, the JSONL conversation event log and transcript files.

pub mod config;
pub mod logging;
pub mod output;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, ConversationConfig, FileConfig, LoadedConfig};
pub use logging::JsonlConversationLogger;
pub use output::TranscriptStore;
pub use providers::{
    AnthropicProvider, AnthropicSettings, OpenAiProvider, OpenAiSettings, ProviderSettings,
    builtin_registry,
};
