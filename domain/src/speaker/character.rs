//! Character definitions and the generation parameters derived from them

use serde::{Deserialize, Serialize};

/// Default sampling temperature when a character does not set one.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Default response length cap when a character does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 500;
/// Default nucleus sampling mass when a character does not set one.
pub const DEFAULT_TOP_P: f64 = 1.0;
/// Default frequency/presence penalty for providers that accept them.
pub const DEFAULT_PENALTY: f64 = 0.0;

/// Persona a speaker plays (Value Object)
///
/// Character files written as JSON often use camelCase keys,
/// so the camelCase spellings are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterDefinition {
    /// Name shown in transcripts; the speaker id is used when absent
    #[serde(default, rename = "name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, alias = "systemPrompt")]
    pub system_prompt: String,
    #[serde(default, rename = "parameters")]
    pub params: CharacterParams,
}

impl CharacterDefinition {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            display_name: None,
            system_prompt: system_prompt.into(),
            params: CharacterParams::default(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_params(mut self, params: CharacterParams) -> Self {
        self.params = params;
        self
    }

    /// System prompt, or `None` when the character does not define one
    pub fn system_prompt(&self) -> Option<&str> {
        let trimmed = self.system_prompt.trim();
        (!trimmed.is_empty()).then_some(self.system_prompt.as_str())
    }
}

/// Generation parameters as written by the character author
///
/// Every field is optional; providers fill the gaps with their own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(alias = "maxTokens", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(alias = "topP", skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(alias = "frequencyPenalty", skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(alias = "presencePenalty", skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
}

/// Concrete parameters handed to a provider for one request
///
/// Penalties are `None` for providers that do not support them; such
/// providers must not send the fields at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
}

impl GenerationParams {
    /// Resolve core sampling parameters, leaving penalties unset.
    pub fn without_penalties(params: &CharacterParams) -> Self {
        Self {
            temperature: params.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            top_p: params.top_p.unwrap_or(DEFAULT_TOP_P),
            frequency_penalty: None,
            presence_penalty: None,
        }
    }

    /// Resolve all parameters, defaulting absent penalties to zero.
    pub fn with_penalties(params: &CharacterParams) -> Self {
        Self {
            frequency_penalty: Some(params.frequency_penalty.unwrap_or(DEFAULT_PENALTY)),
            presence_penalty: Some(params.presence_penalty.unwrap_or(DEFAULT_PENALTY)),
            ..Self::without_penalties(params)
        }
    }
}
