//! A single speaker contribution

use crate::speaker::entities::SpeakerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One speaker's contribution to the conversation (Value Object)
///
/// Immutable once created; fields are only readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    turn_number: u32,
    speaker_id: SpeakerId,
    prompt: String,
    response: String,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    placeholder: bool,
}

impl Turn {
    /// Create a turn stamped with the current time.
    pub fn new(
        turn_number: u32,
        speaker_id: SpeakerId,
        prompt: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self::at(turn_number, speaker_id, prompt, response, Utc::now())
    }

    /// Create a turn with an explicit timestamp.
    pub fn at(
        turn_number: u32,
        speaker_id: SpeakerId,
        prompt: impl Into<String>,
        response: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            turn_number,
            speaker_id,
            prompt: prompt.into(),
            response: response.into(),
            timestamp,
            placeholder: false,
        }
    }

    /// Turn recorded when the speaker's provider produced no text.
    pub fn placeholder(
        turn_number: u32,
        speaker_id: SpeakerId,
        prompt: impl Into<String>,
        reason: &str,
    ) -> Self {
        Self {
            placeholder: true,
            ..Self::new(turn_number, speaker_id, prompt, Self::placeholder_response(reason))
        }
    }

    /// Response text carried by a placeholder turn.
    pub fn placeholder_response(reason: &str) -> String {
        format!("[error: {}]", reason)
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn speaker_id(&self) -> &SpeakerId {
        &self.speaker_id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// True when the response is an error placeholder rather than generated text
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}
