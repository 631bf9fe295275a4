//! Configuration file loading for colloquy
//!
//! This module handles file I/O, merging of configuration from multiple
//! sources and resolution into validated domain values. Priority (highest
//! to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./colloquy.toml` or `./.colloquy.toml`
//! 3. Global: `$XDG_CONFIG_HOME/colloquy/config.toml`
//! 4. Default values

mod error;
mod file_config;
mod loader;
mod resolve;

pub use error::ConfigError;
pub use file_config::{
    FileAnthropicConfig, FileConfig, FileConversationConfig, FileErrorHandlingConfig,
    FileOpenAiConfig, FileOutputConfig, FileProvidersConfig, FileSpeakerConfig,
};
pub use loader::{ConfigLoader, ConfigSource, LoadedConfig};
pub use resolve::ConversationConfig;
