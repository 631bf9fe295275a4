//! Console output for finished conversations

use super::formatter::TranscriptView;
use colloquy_domain::{ConversationStatus, Turn, preview};
use colored::Colorize;

/// Formats conversations for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Full conversation with a header and one block per turn
    pub fn format(view: &TranscriptView<'_>) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("LLM Conversation"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), view.topic));

        let names: Vec<String> = view
            .roster
            .iter()
            .map(|s| format!("{} ({}/{})", s.display_name(), s.provider_kind, s.model))
            .collect();
        output.push_str(&format!(
            "{} {}\n",
            "Speakers:".cyan().bold(),
            names.join(", ")
        ));

        for turn in view.transcript {
            output.push_str(&Self::turn_block(view.speaker_name(turn), turn));
        }

        output.push('\n');
        output.push_str(&Self::summary(view));
        output.push_str(&Self::footer());
        output
    }

    /// One-line outcome, e.g. "Completed: 6 of 6 turns"
    pub fn summary(view: &TranscriptView<'_>) -> String {
        let planned = view.transcript.capacity();
        let done = view.transcript.len();
        let placeholders = view.transcript.iter().filter(|t| t.is_placeholder()).count();

        let label = match view.status {
            ConversationStatus::Completed => "Completed".green().bold(),
            ConversationStatus::Aborted => "Aborted".red().bold(),
            ConversationStatus::Cancelled => "Cancelled".yellow().bold(),
            other => other.as_str().normal(),
        };

        let mut line = format!("{}: {} of {} turns", label, done, planned);
        if placeholders > 0 {
            line.push_str(&format!(" ({} without a response)", placeholders));
        }
        line.push('\n');
        line
    }

    fn turn_block(name: &str, turn: &Turn) -> String {
        let heading = format!("── Turn {}: {} ──", turn.turn_number(), name);
        let heading = if turn.is_placeholder() {
            heading.red().bold()
        } else {
            heading.yellow().bold()
        };
        format!("\n{}\n{}\n", heading, turn.response())
    }

    /// Short single-line rendering used by progress output
    pub fn turn_line(name: &str, turn: &Turn) -> String {
        format!(
            "{} {}: {}",
            format!("[{}]", turn.turn_number()).dimmed(),
            name.bold(),
            preview(turn.response(), 80)
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample;

    #[test]
    fn test_format_contains_every_turn() {
        let (roster, transcript) = sample();
        let view = TranscriptView::new(
            "Tea or coffee?",
            &roster,
            &transcript,
            ConversationStatus::Completed,
        );

        let out = ConsoleFormatter::format(&view);

        assert!(out.contains("Tea or coffee?"));
        assert!(out.contains("Turn 1: Alice"));
        assert!(out.contains("Tea, obviously."));
        assert!(out.contains("Turn 2: bob"));
        assert!(out.contains("2 of 3 turns"));
    }

    #[test]
    fn test_summary_counts_placeholders() {
        let (roster, mut transcript) = sample();
        transcript
            .push(Turn::placeholder(3, "alice".into(), "p", "timeout"))
            .unwrap();
        let view = TranscriptView::new("t", &roster, &transcript, ConversationStatus::Completed);

        let summary = ConsoleFormatter::summary(&view);

        assert!(summary.contains("3 of 3 turns"));
        assert!(summary.contains("1 without a response"));
    }
}
