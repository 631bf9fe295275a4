//! LLM provider port
//!
//! Defines the capability every text-generation backend exposes to the
//! conversation engine. Implementations (HTTP adapters) live in the
//! infrastructure layer.

use async_trait::async_trait;
use colloquy_domain::{CharacterDefinition, GenerationParams, ProviderKind};
use thiserror::Error;

/// Errors a provider can report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider cannot be constructed (missing credentials, unknown kind).
    /// Fatal and never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No response was received at all (connect failure, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status
    #[error("Backend returned status {status}: {body}")]
    BadStatus { status: u16, body: String },

    /// Backend answered successfully but without any text
    #[error("Empty content: {0}")]
    EmptyContent(String),
}

impl ProviderError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProviderError::Configuration(_))
    }

    /// Whether the failure happened while talking to the backend
    pub fn is_call_failure(&self) -> bool {
        !self.is_configuration()
    }
}

/// A text-generation backend speaking one wire protocol
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Kind this provider was registered under
    fn kind(&self) -> &ProviderKind;

    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Resolve a character's parameters into what this provider sends.
    ///
    /// Providers without penalty support return `None` penalties.
    fn map_character_params(&self, character: &CharacterDefinition) -> GenerationParams;

    /// Generate text for `prompt`.
    async fn generate_response(
        &self,
        prompt: &str,
        params: &GenerationParams,
        system_prompt: Option<&str>,
    ) -> Result<String, ProviderError>;
}
