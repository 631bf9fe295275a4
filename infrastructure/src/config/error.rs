//! Configuration errors

use colloquy_domain::DomainError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error(
        "Character '{reference}' for speaker '{speaker}' is neither defined in [characters] nor a file under {}",
        .base_dir.display()
    )]
    CharacterNotFound {
        speaker: String,
        reference: String,
        base_dir: PathBuf,
    },

    #[error("Failed to read character file {}: {source}", .path.display())]
    CharacterIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid character file {}: {message}", .path.display())]
    CharacterParse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] DomainError),
}
