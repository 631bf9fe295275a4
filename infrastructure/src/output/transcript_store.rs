//! Writes a rendered transcript to disk

use chrono::{DateTime, Utc};
use colloquy_domain::OutputFormat;
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for a rendered transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptStore {
    path: PathBuf,
}

impl TranscriptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/conversation-<timestamp>.<ext>`, colons and dots in the
    /// timestamp replaced so the name is portable
    pub fn timestamped(dir: impl AsRef<Path>, format: OutputFormat, at: DateTime<Utc>) -> Self {
        let stamp = at
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        Self::new(
            dir.as_ref()
                .join(format!("conversation-{}.{}", stamp, format.extension())),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents`, creating parent directories, replacing any
    /// existing file.
    pub fn save(&self, contents: &str) -> std::io::Result<&Path> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, contents)?;
        info!(path = %self.path.display(), bytes = contents.len(), "Transcript saved");
        Ok(&self.path)
    }
}
