//! Turn raw file configuration into validated domain values
//!
//! Character references are looked up in the inline `[characters]` table
//! first, then as files relative to the directory the configuration came
//! from: `characters/<ref>` before `<ref>`. Extensionless references also
//! try `characters/<ref>.toml` and `characters/<ref>.json`.

use super::error::ConfigError;
use super::file_config::{FileConfig, FileOutputConfig};
use crate::providers::ProviderSettings;
use colloquy_domain::{
    CharacterDefinition, ConversationSettings, ErrorPolicyConfig, SpeakerDefinition, SpeakerRoster,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Everything needed to run one conversation
#[derive(Debug, Clone)]
pub struct ConversationConfig {
    pub roster: SpeakerRoster,
    pub settings: ConversationSettings,
    pub policy: ErrorPolicyConfig,
    pub providers: ProviderSettings,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate and resolve against the process environment.
    pub fn resolve(&self, base_dir: &Path) -> Result<ConversationConfig, ConfigError> {
        self.resolve_with_env(base_dir, |name| std::env::var(name).ok())
    }

    /// Validate and resolve, reading credentials through `lookup`.
    pub fn resolve_with_env(
        &self,
        base_dir: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<ConversationConfig, ConfigError> {
        let characters = CharacterResolver::new(&self.characters, base_dir);

        let speakers = self
            .speakers
            .iter()
            .map(|s| {
                let character = characters.resolve(&s.id, &s.character)?;
                Ok(SpeakerDefinition::new(
                    s.id.trim(),
                    s.provider.as_str(),
                    s.model.clone(),
                    character,
                ))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let roster = SpeakerRoster::new(speakers)?;

        let conversation = &self.conversation;
        let topic = conversation.topic.clone().unwrap_or_default();
        let first_speaker = match conversation.first_speaker.as_deref() {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => roster.first().id.to_string(),
        };
        let settings = ConversationSettings::new(topic, conversation.num_turns, first_speaker)
            .with_delay(Duration::from_millis(conversation.delay_between_turns_ms));
        settings.validate(&roster)?;

        let policy = self.error_handling.to_policy()?;

        Ok(ConversationConfig {
            roster,
            settings,
            policy,
            providers: self.providers.to_settings_with(lookup),
            output: self.output.clone(),
        })
    }
}

struct CharacterResolver<'a> {
    inline: &'a BTreeMap<String, CharacterDefinition>,
    base_dir: &'a Path,
}

impl<'a> CharacterResolver<'a> {
    fn new(inline: &'a BTreeMap<String, CharacterDefinition>, base_dir: &'a Path) -> Self {
        Self { inline, base_dir }
    }

    fn resolve(&self, speaker: &str, reference: &str) -> Result<CharacterDefinition, ConfigError> {
        let reference = reference.trim();
        if let Some(character) = self.inline.get(reference) {
            return Ok(character.clone());
        }

        let path = self.candidates(reference).into_iter().find(|p| p.is_file());
        match path {
            Some(path) => {
                debug!(speaker, path = %path.display(), "Loading character file");
                load_character_file(&path)
            }
            None => Err(ConfigError::CharacterNotFound {
                speaker: speaker.to_string(),
                reference: reference.to_string(),
                base_dir: self.base_dir.to_path_buf(),
            }),
        }
    }

    fn candidates(&self, reference: &str) -> Vec<PathBuf> {
        if reference.is_empty() {
            return Vec::new();
        }
        let as_path = Path::new(reference);
        if as_path.is_absolute() {
            return vec![as_path.to_path_buf()];
        }

        let characters_dir = self.base_dir.join("characters");
        let mut candidates = vec![characters_dir.join(reference), self.base_dir.join(reference)];
        if as_path.extension().is_none() {
            candidates.push(characters_dir.join(format!("{reference}.toml")));
            candidates.push(characters_dir.join(format!("{reference}.json")));
        }
        candidates
    }
}

fn load_character_file(path: &Path) -> Result<CharacterDefinition, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::CharacterIo {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let parsed = if is_toml {
        toml::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| ConfigError::CharacterParse {
        path: path.to_path_buf(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file_config::FileSpeakerConfig;
    use colloquy_domain::{DomainError, ErrorStrategy};

    fn speaker(id: &str, provider: &str, character: &str) -> FileSpeakerConfig {
        FileSpeakerConfig {
            id: id.to_string(),
            provider: provider.to_string(),
            model: format!("{id}-model"),
            character: character.to_string(),
        }
    }

    fn config_with_inline_characters() -> FileConfig {
        let mut config = FileConfig::default();
        config.conversation.topic = Some("Cats or dogs?".into());
        config.conversation.num_turns = 4;
        config.speakers = vec![
            speaker("alice", "openai", "cat_person"),
            speaker("bob", "anthropic", "dog_person"),
        ];
        config.characters.insert(
            "cat_person".into(),
            CharacterDefinition::new("You love cats.").with_display_name("Alice"),
        );
        config.characters.insert(
            "dog_person".into(),
            CharacterDefinition::new("You love dogs."),
        );
        config
    }

    #[test]
    fn test_resolve_inline_characters_and_default_first_speaker() {
        let config = config_with_inline_characters();

        let resolved = config.resolve_with_env(Path::new("."), |_| None).unwrap();

        assert_eq!(resolved.roster.len(), 2);
        assert_eq!(resolved.settings.first_speaker, "alice");
        assert_eq!(resolved.settings.num_turns, 4);
        assert_eq!(resolved.policy.strategy, ErrorStrategy::Retry);
        let alice = resolved.roster.first();
        assert_eq!(alice.display_name(), "Alice");
        assert_eq!(alice.model, "alice-model");
    }

    #[test]
    fn test_character_file_under_characters_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("characters")).unwrap();
        std::fs::write(
            dir.path().join("characters").join("skeptic.json"),
            r#"{"name":"Hume","systemPrompt":"Doubt everything.","parameters":{"maxTokens":200}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("believer.toml"),
            "name = \"Berkeley\"\nsystem_prompt = \"Believe.\"\n",
        )
        .unwrap();

        let mut config = config_with_inline_characters();
        config.speakers = vec![
            speaker("hume", "openai", "skeptic.json"),
            speaker("berkeley", "anthropic", "believer.toml"),
        ];

        let resolved = config.resolve_with_env(dir.path(), |_| None).unwrap();

        let hume = resolved.roster.first();
        assert_eq!(hume.display_name(), "Hume");
        assert_eq!(hume.character.system_prompt, "Doubt everything.");
        assert_eq!(hume.character.params.max_tokens, Some(200));
        let ids: Vec<&str> = resolved.roster.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["hume", "berkeley"]);
        assert_eq!(resolved.roster.iter().nth(1).unwrap().display_name(), "Berkeley");
    }

    #[test]
    fn test_extensionless_reference_finds_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("characters")).unwrap();
        std::fs::write(
            dir.path().join("characters").join("stoic.toml"),
            "system_prompt = \"Stay calm.\"\n",
        )
        .unwrap();

        let mut config = config_with_inline_characters();
        config.speakers[0].character = "stoic".into();

        let resolved = config.resolve_with_env(dir.path(), |_| None).unwrap();
        assert_eq!(resolved.roster.first().character.system_prompt, "Stay calm.");
    }

    #[test]
    fn test_missing_character_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with_inline_characters();
        config.speakers[1].character = "ghost.json".into();

        let err = config.resolve_with_env(dir.path(), |_| None).unwrap_err();

        match err {
            ConfigError::CharacterNotFound {
                speaker, reference, ..
            } => {
                assert_eq!(speaker, "bob");
                assert_eq!(reference, "ghost.json");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_character_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        let mut config = config_with_inline_characters();
        config.speakers[0].character = "broken.json".into();

        let err = config.resolve_with_env(dir.path(), |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::CharacterParse { .. }));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = config_with_inline_characters();
        config.speakers.truncate(1);
        assert!(matches!(
            config.resolve_with_env(Path::new("."), |_| None),
            Err(ConfigError::Invalid(DomainError::NotEnoughSpeakers(1)))
        ));

        let mut config = config_with_inline_characters();
        config.speakers[1].id = "alice".into();
        assert!(matches!(
            config.resolve_with_env(Path::new("."), |_| None),
            Err(ConfigError::Invalid(DomainError::DuplicateSpeaker(_)))
        ));

        let mut config = config_with_inline_characters();
        config.conversation.topic = None;
        assert!(matches!(
            config.resolve_with_env(Path::new("."), |_| None),
            Err(ConfigError::Invalid(DomainError::EmptyTopic))
        ));

        let mut config = config_with_inline_characters();
        config.conversation.num_turns = 0;
        assert!(matches!(
            config.resolve_with_env(Path::new("."), |_| None),
            Err(ConfigError::Invalid(DomainError::ZeroTurns))
        ));

        let mut config = config_with_inline_characters();
        config.conversation.first_speaker = Some("carol".into());
        assert!(matches!(
            config.resolve_with_env(Path::new("."), |_| None),
            Err(ConfigError::Invalid(DomainError::UnknownSpeaker(_)))
        ));

        let mut config = config_with_inline_characters();
        config.error_handling.strategy = "fallback".into();
        assert!(matches!(
            config.resolve_with_env(Path::new("."), |_| None),
            Err(ConfigError::Invalid(DomainError::InvalidPolicy(_)))
        ));
    }

    #[test]
    fn test_credentials_come_from_lookup() {
        let config = config_with_inline_characters();
        let resolved = config
            .resolve_with_env(Path::new("."), |name| {
                (name == "ANTHROPIC_API_KEY").then(|| "sk-ant".to_string())
            })
            .unwrap();
        assert_eq!(resolved.providers.anthropic.api_key.as_deref(), Some("sk-ant"));
        assert!(resolved.providers.openai.api_key.is_none());
    }
}
