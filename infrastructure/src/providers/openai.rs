//! Chat-completion provider (`openai` kind)

use super::OpenAiSettings;
use super::http::{post_json, require_key};
use async_trait::async_trait;
use colloquy_application::{LlmProvider, ProviderError};
use colloquy_domain::{CharacterDefinition, GenerationParams, ProviderKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for `POST <base>/v1/chat/completions`
pub struct OpenAiProvider {
    kind: ProviderKind,
    model: String,
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        settings: &OpenAiSettings,
        model: impl Into<String>,
        client: reqwest::Client,
    ) -> Result<Self, ProviderError> {
        let api_key = require_key(settings.api_key.as_deref(), &settings.api_key_env, "OpenAI")?;
        Ok(Self {
            kind: ProviderKind::openai(),
            model: model.into(),
            api_key,
            endpoint: format!(
                "{}/v1/chat/completions",
                settings.base_url.trim_end_matches('/')
            ),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn kind(&self) -> &ProviderKind {
        &self.kind
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn map_character_params(&self, character: &CharacterDefinition) -> GenerationParams {
        GenerationParams::with_penalties(&character.params)
    }

    async fn generate_response(
        &self,
        prompt: &str,
        params: &GenerationParams,
        system_prompt: Option<&str>,
    ) -> Result<String, ProviderError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            frequency_penalty: params.frequency_penalty,
            presence_penalty: params.presence_penalty,
        };

        debug!(url = %self.endpoint, model = %self.model, "Sending chat completion request");

        let request = self.client.post(&self.endpoint).bearer_auth(&self.api_key);
        let response: ChatResponse = post_json(request, &body, "OpenAI").await?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            ProviderError::EmptyContent("OpenAI API returned no choices".to_string())
        })?;
        let content = choice.message.content.ok_or_else(|| {
            ProviderError::EmptyContent("OpenAI API returned a choice without content".to_string())
        })?;

        Ok(content.trim().to_string())
    }
}
