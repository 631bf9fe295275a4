//! HTTP provider adapters and the built-in registry
//!
//! Two wire protocols are supported:
//!
//! | Kind        | Endpoint                  | Auth                         |
//! |-------------|---------------------------|------------------------------|
//! | `openai`    | `/v1/chat/completions`    | `Authorization: Bearer <key>`|
//! | `anthropic` | `/v1/messages`            | `x-api-key` + version header |

mod anthropic;
mod http;
mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

use colloquy_application::{LlmProvider, ProviderError, ProviderRegistry};
use colloquy_domain::{ProviderKind, SpeakerDefinition};
use std::sync::Arc;
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolved settings for the chat-completion backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiSettings {
    pub api_key: Option<String>,
    /// Where the key was expected, for error messages
    pub api_key_env: String,
    pub base_url: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
        }
    }
}

/// Resolved settings for the message-block backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnthropicSettings {
    pub api_key: Option<String>,
    pub api_key_env: String,
    pub base_url: String,
    pub api_version: String,
}

impl Default for AnthropicSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
        }
    }
}

/// Everything the built-in providers need, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub request_timeout: Duration,
    pub openai: OpenAiSettings,
    pub anthropic: AnthropicSettings,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            openai: OpenAiSettings::default(),
            anthropic: AnthropicSettings::default(),
        }
    }
}

/// Registry with the `openai` and `anthropic` kinds registered.
///
/// One HTTP client is shared by every provider the registry builds.
pub fn builtin_registry(settings: ProviderSettings) -> Result<ProviderRegistry, ProviderError> {
    let client = http::build_client(settings.request_timeout)?;
    let registry = ProviderRegistry::new();

    let openai_client = client.clone();
    let openai = settings.openai;
    registry.register(
        ProviderKind::openai(),
        move |speaker: &SpeakerDefinition| {
            let provider =
                OpenAiProvider::new(&openai, speaker.model.clone(), openai_client.clone())?;
            Ok(Arc::new(provider) as Arc<dyn LlmProvider>)
        },
    );

    let anthropic = settings.anthropic;
    registry.register(
        ProviderKind::anthropic(),
        move |speaker: &SpeakerDefinition| {
            let provider =
                AnthropicProvider::new(&anthropic, speaker.model.clone(), client.clone())?;
            Ok(Arc::new(provider) as Arc<dyn LlmProvider>)
        },
    );

    Ok(registry)
}
