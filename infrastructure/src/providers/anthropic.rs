//! Message-block provider (`anthropic` kind)
//!
//! The system prompt is a top-level field and penalties are not part of the
//! protocol, so they are never sent.

use super::AnthropicSettings;
use super::http::{post_json, require_key};
use async_trait::async_trait;
use colloquy_application::{LlmProvider, ProviderError};
use colloquy_domain::{CharacterDefinition, GenerationParams, ProviderKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<UserMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Client for `POST <base>/v1/messages`
pub struct AnthropicProvider {
    kind: ProviderKind,
    model: String,
    api_key: String,
    api_version: String,
    endpoint: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(
        settings: &AnthropicSettings,
        model: impl Into<String>,
        client: reqwest::Client,
    ) -> Result<Self, ProviderError> {
        let api_key = require_key(
            settings.api_key.as_deref(),
            &settings.api_key_env,
            "Anthropic",
        )?;
        Ok(Self {
            kind: ProviderKind::anthropic(),
            model: model.into(),
            api_key,
            api_version: settings.api_version.clone(),
            endpoint: format!("{}/v1/messages", settings.base_url.trim_end_matches('/')),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn kind(&self) -> &ProviderKind {
        &self.kind
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn map_character_params(&self, character: &CharacterDefinition) -> GenerationParams {
        GenerationParams::without_penalties(&character.params)
    }

    async fn generate_response(
        &self,
        prompt: &str,
        params: &GenerationParams,
        system_prompt: Option<&str>,
    ) -> Result<String, ProviderError> {
        let body = MessagesRequest {
            model: &self.model,
            system: system_prompt.filter(|s| !s.trim().is_empty()),
            messages: vec![UserMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
        };

        debug!(url = %self.endpoint, model = %self.model, "Sending messages request");

        let request = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version);
        let response: MessagesResponse = post_json(request, &body, "Anthropic").await?;

        let block = response.content.into_iter().next().ok_or_else(|| {
            ProviderError::EmptyContent("Anthropic API returned no content blocks".to_string())
        })?;
        let text = block.text.ok_or_else(|| {
            ProviderError::EmptyContent("Anthropic API returned a non-text block".to_string())
        })?;

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_domain::CharacterParams;

    fn provider() -> AnthropicProvider {
        let settings = AnthropicSettings {
            api_key: Some("key".into()),
            ..Default::default()
        };
        AnthropicProvider::new(&settings, "claude-3-5-sonnet", reqwest::Client::new()).unwrap()
    }

    #[test]
    fn test_penalties_are_dropped() {
        let character = CharacterDefinition::default().with_params(CharacterParams {
            frequency_penalty: Some(0.5),
            presence_penalty: Some(0.5),
            temperature: Some(0.9),
            ..Default::default()
        });
        let params = provider().map_character_params(&character);
        assert_eq!(params.frequency_penalty, None);
        assert_eq!(params.presence_penalty, None);
        assert_eq!(params.temperature, 0.9);
    }

    #[test]
    fn test_request_has_no_system_field_when_absent() {
        let body = MessagesRequest {
            model: "claude",
            system: None,
            messages: vec![UserMessage {
                role: "user",
                content: "hi",
            }],
            max_tokens: 500,
            temperature: 0.7,
            top_p: 1.0,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("system").is_none());
        assert!(json.get("frequency_penalty").is_none());
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(provider().endpoint(), "https://api.anthropic.com/v1/messages");
    }
}
