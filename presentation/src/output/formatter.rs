//! Transcript formatter trait

use colloquy_domain::{ConversationStatus, OutputFormat, SpeakerRoster, Transcript, Turn};

/// Everything a formatter needs to render one conversation
#[derive(Debug, Clone, Copy)]
pub struct TranscriptView<'a> {
    pub topic: &'a str,
    pub roster: &'a SpeakerRoster,
    pub transcript: &'a Transcript,
    pub status: ConversationStatus,
}

impl<'a> TranscriptView<'a> {
    pub fn new(
        topic: &'a str,
        roster: &'a SpeakerRoster,
        transcript: &'a Transcript,
        status: ConversationStatus,
    ) -> Self {
        Self {
            topic,
            roster,
            transcript,
            status,
        }
    }

    /// Display name of the turn's author
    pub fn speaker_name(&self, turn: &'a Turn) -> &'a str {
        self.roster.display_name(turn.speaker_id())
    }
}

/// Renders a conversation into one output format
pub trait TranscriptFormatter {
    fn format(&self, view: &TranscriptView<'_>) -> String;
}

/// Formatter for `format`
pub fn formatter_for(format: OutputFormat) -> Box<dyn TranscriptFormatter> {
    match format {
        OutputFormat::Text => Box::new(super::document::TextFormatter),
        OutputFormat::Markdown => Box::new(super::document::MarkdownFormatter),
        OutputFormat::Json => Box::new(super::json::JsonFormatter),
        OutputFormat::Html => Box::new(super::document::HtmlFormatter),
    }
}

/// Render `view` in `format`
pub fn render(format: OutputFormat, view: &TranscriptView<'_>) -> String {
    formatter_for(format).format(view)
}
