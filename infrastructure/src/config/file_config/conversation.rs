//! Conversation settings from TOML (`[conversation]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConversationConfig {
    pub topic: Option<String>,
    #[serde(alias = "numTurns")]
    pub num_turns: u32,
    #[serde(alias = "delayBetweenTurns")]
    pub delay_between_turns_ms: u64,
    /// Defaults to the first declared speaker
    #[serde(alias = "firstSpeaker")]
    pub first_speaker: Option<String>,
}

impl Default for FileConversationConfig {
    fn default() -> Self {
        Self {
            topic: None,
            num_turns: 6,
            delay_between_turns_ms: 0,
            first_speaker: None,
        }
    }
}
