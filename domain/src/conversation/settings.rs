//! Conversation run settings

use crate::core::error::DomainError;
use crate::speaker::entities::SpeakerId;
use crate::speaker::roster::SpeakerRoster;
use std::time::Duration;

/// What a conversation is about and how long it runs (Value Object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSettings {
    pub topic: String,
    pub num_turns: u32,
    pub delay_between_turns: Duration,
    pub first_speaker: SpeakerId,
}

impl ConversationSettings {
    pub fn new(topic: impl Into<String>, num_turns: u32, first_speaker: impl Into<SpeakerId>) -> Self {
        Self {
            topic: topic.into(),
            num_turns,
            delay_between_turns: Duration::ZERO,
            first_speaker: first_speaker.into(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_between_turns = delay;
        self
    }

    /// Check the settings against the roster they will run with.
    pub fn validate(&self, roster: &SpeakerRoster) -> Result<(), DomainError> {
        if self.topic.trim().is_empty() {
            return Err(DomainError::EmptyTopic);
        }
        if self.num_turns == 0 {
            return Err(DomainError::ZeroTurns);
        }
        if !roster.contains(&self.first_speaker) {
            return Err(DomainError::UnknownSpeaker(self.first_speaker.to_string()));
        }
        Ok(())
    }
}
