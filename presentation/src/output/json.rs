//! JSON transcript document

use super::formatter::{TranscriptFormatter, TranscriptView};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSpeaker<'a> {
    id: &'a str,
    name: &'a str,
    provider: &'a str,
    model: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonTurn<'a> {
    turn: u32,
    speaker_id: &'a str,
    speaker_name: &'a str,
    prompt: &'a str,
    response: &'a str,
    timestamp: String,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    topic: &'a str,
    status: &'a str,
    speakers: Vec<JsonSpeaker<'a>>,
    turns: Vec<JsonTurn<'a>>,
}

/// Pretty-printed JSON with topic, status, speakers and turns
pub struct JsonFormatter;

impl TranscriptFormatter for JsonFormatter {
    fn format(&self, view: &TranscriptView<'_>) -> String {
        let document = JsonDocument {
            topic: view.topic,
            status: view.status.as_str(),
            speakers: view
                .roster
                .iter()
                .map(|s| JsonSpeaker {
                    id: s.id.as_str(),
                    name: s.display_name(),
                    provider: s.provider_kind.as_str(),
                    model: &s.model,
                })
                .collect(),
            turns: view
                .transcript
                .iter()
                .map(|t| JsonTurn {
                    turn: t.turn_number(),
                    speaker_id: t.speaker_id().as_str(),
                    speaker_name: view.speaker_name(t),
                    prompt: t.prompt(),
                    response: t.response(),
                    timestamp: t.timestamp().to_rfc3339(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string())
    }
}
