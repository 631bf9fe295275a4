//! Plain text, Markdown and HTML transcript documents

use super::formatter::{TranscriptFormatter, TranscriptView};
use colloquy_domain::ConversationStatus;

/// `Name: response` blocks under a short header
pub struct TextFormatter;

impl TranscriptFormatter for TextFormatter {
    fn format(&self, view: &TranscriptView<'_>) -> String {
        let mut output = format!("LLM CONVERSATION\nTopic: {}\n\n", view.topic);
        for turn in view.transcript {
            output.push_str(&format!("{}: {}\n\n", view.speaker_name(turn), turn.response()));
        }
        if let Some(note) = status_note(view.status) {
            output.push_str(&format!("({})\n", note));
        }
        output
    }
}

/// `# LLM Conversation` with one `## Turn n: Name` section per turn
pub struct MarkdownFormatter;

impl TranscriptFormatter for MarkdownFormatter {
    fn format(&self, view: &TranscriptView<'_>) -> String {
        let mut output = format!("# LLM Conversation\n\n**Topic:** {}\n\n", view.topic);
        for turn in view.transcript {
            output.push_str(&format!(
                "## Turn {}: {}\n\n{}\n\n",
                turn.turn_number(),
                view.speaker_name(turn),
                turn.response()
            ));
        }
        if let Some(note) = status_note(view.status) {
            output.push_str(&format!("_{}_\n", note));
        }
        output
    }
}

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>LLM Conversation</title>
  <style>
    body { font-family: Arial, sans-serif; line-height: 1.6; max-width: 800px; margin: 0 auto; padding: 20px; }
    h1 { text-align: center; margin-bottom: 30px; }
    .turn { margin-bottom: 30px; padding: 15px; border-radius: 5px; }
    .turn:nth-child(odd) { background-color: #f5f5f5; }
    .turn-header { font-weight: bold; margin-bottom: 10px; color: #333; }
    .turn-content { white-space: pre-wrap; }
    .metadata { font-size: 0.8em; color: #666; margin-top: 10px; }
  </style>
</head>
<body>
  <h1>LLM Conversation</h1>
"#;

/// Minimal standalone page; all conversation text is escaped
pub struct HtmlFormatter;

impl TranscriptFormatter for HtmlFormatter {
    fn format(&self, view: &TranscriptView<'_>) -> String {
        let mut output = String::from(HTML_HEAD);
        output.push_str(&format!(
            "  <p class=\"topic\">Topic: {}</p>\n",
            escape_html(view.topic)
        ));
        for turn in view.transcript {
            output.push_str(&format!(
                "  <div class=\"turn\">\n    <div class=\"turn-header\">Turn {}: {}</div>\n    <div class=\"turn-content\">{}</div>\n    <div class=\"metadata\">Timestamp: {}</div>\n  </div>\n",
                turn.turn_number(),
                escape_html(view.speaker_name(turn)),
                escape_html(turn.response()),
                turn.timestamp().to_rfc3339()
            ));
        }
        if let Some(note) = status_note(view.status) {
            output.push_str(&format!("  <p class=\"metadata\">{}</p>\n", note));
        }
        output.push_str("</body>\n</html>\n");
        output
    }
}

fn status_note(status: ConversationStatus) -> Option<&'static str> {
    match status {
        ConversationStatus::Aborted => Some("Conversation aborted before all turns completed"),
        ConversationStatus::Cancelled => Some("Conversation cancelled"),
        _ => None,
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample;

    #[test]
    fn test_text_lists_names_and_responses_in_order() {
        let (roster, transcript) = sample();
        let view = TranscriptView::new(
            "Tea or coffee?",
            &roster,
            &transcript,
            ConversationStatus::Completed,
        );

        let text = TextFormatter.format(&view);

        assert!(text.starts_with("LLM CONVERSATION\nTopic: Tea or coffee?\n\n"));
        let alice = text.find("Alice: Tea, obviously.").unwrap();
        let bob = text.find("bob: Coffee <always> & forever.").unwrap();
        assert!(alice < bob);
        assert!(!text.contains("aborted"));
    }

    #[test]
    fn test_markdown_sections() {
        let (roster, transcript) = sample();
        let view = TranscriptView::new(
            "Tea or coffee?",
            &roster,
            &transcript,
            ConversationStatus::Aborted,
        );

        let md = MarkdownFormatter.format(&view);

        assert!(md.starts_with("# LLM Conversation\n\n"));
        assert!(md.contains("## Turn 1: Alice\n\nTea, obviously.\n\n"));
        assert!(md.contains("## Turn 2: bob\n\n"));
        assert!(md.contains("_Conversation aborted before all turns completed_"));
    }

    #[test]
    fn test_html_escapes_content() {
        let (roster, transcript) = sample();
        let view = TranscriptView::new(
            "<script>",
            &roster,
            &transcript,
            ConversationStatus::Completed,
        );

        let html = HtmlFormatter.format(&view);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Coffee &lt;always&gt; &amp; forever."));
        assert!(html.contains("Topic: &lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_escape_html_quotes() {
        assert_eq!(escape_html(r#"a "b" 'c'"#), "a &quot;b&quot; &#039;c&#039;");
    }
}
