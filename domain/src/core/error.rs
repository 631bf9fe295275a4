//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// All of these describe an invalid conversation setup and are surfaced
/// before the first turn runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("At least two speakers are required, got {0}")]
    NotEnoughSpeakers(usize),

    #[error("Duplicate speaker id: {0}")]
    DuplicateSpeaker(String),

    #[error("Speaker id cannot be empty")]
    EmptySpeakerId,

    #[error("Unknown speaker: {0}")]
    UnknownSpeaker(String),

    #[error("Conversation topic cannot be empty")]
    EmptyTopic,

    #[error("Number of turns must be at least 1")]
    ZeroTurns,

    #[error("Invalid error policy: {0}")]
    InvalidPolicy(String),

    #[error("Turn {got} cannot follow turn {expected_previous}")]
    TurnOutOfOrder { expected_previous: u32, got: u32 },

    #[error("Transcript is full ({0} turns)")]
    TranscriptFull(u32),
}

impl DomainError {
    /// Check if this error comes from the speaker set rather than the settings
    pub fn is_speaker_error(&self) -> bool {
        matches!(
            self,
            DomainError::NotEnoughSpeakers(_)
                | DomainError::DuplicateSpeaker(_)
                | DomainError::EmptySpeakerId
                | DomainError::UnknownSpeaker(_)
        )
    }
}
