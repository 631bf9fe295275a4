//! Raw TOML configuration data types
//!
//! These structs mirror the config file exactly. Turning them into
//! validated domain values happens in [`resolve`](super::resolve).

mod conversation;
mod error_handling;
mod output;
mod providers;
mod speakers;

pub use conversation::FileConversationConfig;
pub use error_handling::FileErrorHandlingConfig;
pub use output::FileOutputConfig;
pub use providers::{FileAnthropicConfig, FileOpenAiConfig, FileProvidersConfig};
pub use speakers::FileSpeakerConfig;

use colloquy_domain::CharacterDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub conversation: FileConversationConfig,
    /// Participants in declaration order
    pub speakers: Vec<FileSpeakerConfig>,
    /// Inline characters, referenced by name from `[[speakers]]`
    pub characters: BTreeMap<String, CharacterDefinition>,
    pub error_handling: FileErrorHandlingConfig,
    pub providers: FileProvidersConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Copy with every inline API key replaced, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for key in [
            &mut copy.providers.openai.api_key,
            &mut copy.providers.anthropic.api_key,
        ] {
            if key.is_some() {
                *key = Some("<redacted>".to_string());
            }
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[conversation]
topic = "Is mathematics discovered or invented?"
num_turns = 4
delay_between_turns_ms = 250
first_speaker = "bob"

[[speakers]]
id = "alice"
provider = "openai"
model = "gpt-4o"
character = "platonist"

[[speakers]]
id = "bob"
provider = "anthropic"
model = "claude-3-5-sonnet-latest"
character = "formalist.json"

[characters.platonist]
name = "Plato"
system_prompt = "You believe in mathematical realism."
[characters.platonist.parameters]
temperature = 0.9
max_tokens = 300

[error_handling]
strategy = "fallback"
fallback_provider = "anthropic"

[providers]
request_timeout_secs = 15

[output]
format = "markdown"
save_path = "out/conversation.md"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.conversation.num_turns, 4);
        assert_eq!(config.conversation.first_speaker.as_deref(), Some("bob"));
        assert_eq!(config.speakers.len(), 2);
        assert_eq!(config.speakers[1].character, "formalist.json");

        let plato = &config.characters["platonist"];
        assert_eq!(plato.display_name.as_deref(), Some("Plato"));
        assert_eq!(plato.params.temperature, Some(0.9));
        assert_eq!(plato.params.max_tokens, Some(300));

        assert_eq!(config.error_handling.strategy, "fallback");
        assert_eq!(config.error_handling.max_retries, 3);
        assert_eq!(config.providers.request_timeout_secs, 15);
        assert_eq!(config.output.format, Some(OutputFormat::Markdown));
        assert!(config.output.display_in_console);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.conversation.topic.is_none());
        assert_eq!(config.conversation.num_turns, 6);
        assert!(config.speakers.is_empty());
        assert_eq!(config.error_handling.strategy, "retry");
        assert_eq!(config.providers.openai.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_redacted_hides_inline_keys() {
        let mut config = FileConfig::default();
        config.providers.openai.api_key = Some("sk-secret".into());

        let shown = config.redacted();
        assert_eq!(shown.providers.openai.api_key.as_deref(), Some("<redacted>"));
        assert!(shown.providers.anthropic.api_key.is_none());
    }
}
