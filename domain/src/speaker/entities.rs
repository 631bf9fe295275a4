//! Speaker identity value objects

use super::character::CharacterDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a configured speaker (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeakerId(String);

impl SpeakerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpeakerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SpeakerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for SpeakerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SpeakerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Backend kind a speaker is served by (Value Object)
///
/// The set of kinds is open: any string can name a kind, and whether it can
/// actually be constructed is decided by the provider registry. Kinds are
/// compared case-insensitively, so they are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ProviderKind(String);

impl ProviderKind {
    pub const OPENAI: &'static str = "openai";
    pub const ANTHROPIC: &'static str = "anthropic";

    pub fn new(kind: impl AsRef<str>) -> Self {
        Self(kind.as_ref().trim().to_lowercase())
    }

    pub fn openai() -> Self {
        Self::new(Self::OPENAI)
    }

    pub fn anthropic() -> Self {
        Self::new(Self::ANTHROPIC)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProviderKind {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ProviderKind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<ProviderKind> for String {
    fn from(kind: ProviderKind) -> Self {
        kind.0
    }
}

/// A configured participant in the conversation (Entity)
///
/// The character is stored resolved: the configuration layer looks up the
/// character reference before a definition is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerDefinition {
    pub id: SpeakerId,
    pub provider_kind: ProviderKind,
    pub model: String,
    pub character: CharacterDefinition,
}

impl SpeakerDefinition {
    pub fn new(
        id: impl Into<SpeakerId>,
        provider_kind: impl Into<ProviderKind>,
        model: impl Into<String>,
        character: CharacterDefinition,
    ) -> Self {
        Self {
            id: id.into(),
            provider_kind: provider_kind.into(),
            model: model.into(),
            character,
        }
    }

    /// Same speaker served by another backend kind (model and character kept).
    pub fn with_provider_kind(&self, kind: ProviderKind) -> Self {
        Self {
            provider_kind: kind,
            ..self.clone()
        }
    }

    /// Name used in transcripts: the character's display name, else the id.
    pub fn display_name(&self) -> &str {
        self.character
            .display_name
            .as_deref()
            .unwrap_or(self.id.as_str())
    }
}
