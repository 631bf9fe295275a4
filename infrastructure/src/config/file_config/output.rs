//! Output configuration from TOML (`[output]` section)

use colloquy_domain::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Console/save format; inferred from `save_path` when unset
    pub format: Option<OutputFormat>,
    pub save_path: Option<PathBuf>,
    /// JSONL conversation event log
    pub event_log: Option<PathBuf>,
    pub display_in_console: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            save_path: None,
            event_log: None,
            display_in_console: true,
        }
    }
}

impl FileOutputConfig {
    /// Configured format, else the one implied by the save path, else text
    pub fn effective_format(&self) -> OutputFormat {
        self.format
            .or_else(|| {
                self.save_path
                    .as_deref()
                    .and_then(|p| p.to_str())
                    .and_then(OutputFormat::from_extension)
            })
            .unwrap_or_default()
    }
}
