//! Progress notification port
//!
//! Defines the interface for reporting progress while a conversation runs.

use colloquy_domain::{
    ConversationSettings, ConversationStatus, SpeakerDefinition, SpeakerRoster, Transcript, Turn,
};
use std::time::Duration;

/// Callback for progress updates during a conversation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinners, plain lines, nothing).
pub trait ConversationProgress: Send + Sync {
    /// Called once before the first turn
    fn on_conversation_start(&self, _settings: &ConversationSettings, _roster: &SpeakerRoster) {}

    /// Called when a speaker starts producing a turn
    fn on_turn_start(&self, turn_number: u32, total_turns: u32, speaker: &SpeakerDefinition);

    /// Called when a turn has been appended to the transcript
    fn on_turn_complete(&self, turn: &Turn, speaker: &SpeakerDefinition, elapsed: Duration);

    /// Called when the error policy gave up on a turn
    fn on_turn_failed(&self, _turn_number: u32, _speaker: &SpeakerDefinition, _error: &str) {}

    /// Called before the pause between two turns
    fn on_delay(&self, _delay: Duration) {}

    /// Called once with the final status
    fn on_conversation_end(&self, status: ConversationStatus, transcript: &Transcript);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ConversationProgress for NoProgress {
    fn on_turn_start(&self, _turn_number: u32, _total: u32, _speaker: &SpeakerDefinition) {}
    fn on_turn_complete(&self, _turn: &Turn, _speaker: &SpeakerDefinition, _elapsed: Duration) {}
    fn on_conversation_end(&self, _status: ConversationStatus, _transcript: &Transcript) {}
}
