//! Port for structured conversation event logging.
//!
//! Records the lifecycle of a conversation (start, every turn, failures,
//! final status) as machine-readable events, typically one JSONL line each.
//! Human-readable diagnostics go through `tracing` instead.

use colloquy_domain::{
    ConversationSettings, ConversationStatus, SpeakerDefinition, SpeakerRoster, Turn,
};
use serde_json::{Value, json};
use std::time::Duration;

/// A structured conversation event.
///
/// The adapter adds the UTC timestamp when it writes the record.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// Event type identifier (e.g. "turn_completed")
    pub event_type: &'static str,
    /// Event-specific fields
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn conversation_started(settings: &ConversationSettings, roster: &SpeakerRoster) -> Self {
        let speakers: Vec<Value> = roster
            .iter()
            .map(|s| {
                json!({
                    "id": s.id.as_str(),
                    "name": s.display_name(),
                    "provider": s.provider_kind.as_str(),
                    "model": s.model,
                })
            })
            .collect();
        Self::new(
            "conversation_started",
            json!({
                "topic": settings.topic,
                "num_turns": settings.num_turns,
                "first_speaker": settings.first_speaker.as_str(),
                "delay_ms": settings.delay_between_turns.as_millis() as u64,
                "speakers": speakers,
            }),
        )
    }

    pub fn turn_completed(turn: &Turn, speaker: &SpeakerDefinition, elapsed: Duration) -> Self {
        Self::new(
            "turn_completed",
            json!({
                "turn": turn.turn_number(),
                "speaker": turn.speaker_id().as_str(),
                "provider": speaker.provider_kind.as_str(),
                "model": speaker.model,
                "prompt": turn.prompt(),
                "response": turn.response(),
                "placeholder": turn.is_placeholder(),
                "elapsed_ms": elapsed.as_millis() as u64,
            }),
        )
    }

    pub fn turn_failed(turn_number: u32, speaker: &SpeakerDefinition, error: &str) -> Self {
        Self::new(
            "turn_failed",
            json!({
                "turn": turn_number,
                "speaker": speaker.id.as_str(),
                "provider": speaker.provider_kind.as_str(),
                "model": speaker.model,
                "error": error,
            }),
        )
    }

    pub fn conversation_finished(status: ConversationStatus, turns: usize) -> Self {
        Self::new(
            "conversation_finished",
            json!({
                "status": status.as_str(),
                "turns": turns,
            }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// `log` is synchronous and infallible; adapters swallow write failures.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when event logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
