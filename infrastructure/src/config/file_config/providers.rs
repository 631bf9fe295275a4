//! Provider configuration from TOML (`[providers]` section)

use crate::providers::{AnthropicSettings, OpenAiSettings, ProviderSettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Anthropic API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Inline API key; the environment variable is preferred
    pub api_key: Option<String>,
    pub base_url: String,
    /// `anthropic-version` header
    pub api_version: String,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        let defaults = AnthropicSettings::default();
        Self {
            api_key_env: defaults.api_key_env,
            api_key: None,
            base_url: defaults.base_url,
            api_version: defaults.api_version,
        }
    }
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    pub api_key_env: String,
    pub api_key: Option<String>,
    /// Can point at any chat-completion compatible server
    pub base_url: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        let defaults = OpenAiSettings::default();
        Self {
            api_key_env: defaults.api_key_env,
            api_key: None,
            base_url: defaults.base_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub request_timeout_secs: u64,
    pub openai: FileOpenAiConfig,
    pub anthropic: FileAnthropicConfig,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            openai: FileOpenAiConfig::default(),
            anthropic: FileAnthropicConfig::default(),
        }
    }
}

impl FileProvidersConfig {
    /// Resolve credentials from the process environment.
    pub fn to_settings(&self) -> ProviderSettings {
        self.to_settings_with(|name| std::env::var(name).ok())
    }

    /// Resolve credentials with `lookup` standing in for the environment.
    ///
    /// An inline `api_key` wins over the environment variable.
    pub fn to_settings_with(&self, lookup: impl Fn(&str) -> Option<String>) -> ProviderSettings {
        let resolve = |inline: &Option<String>, env: &str| {
            inline
                .clone()
                .filter(|k| !k.trim().is_empty())
                .or_else(|| lookup(env).filter(|k| !k.trim().is_empty()))
        };

        ProviderSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            openai: OpenAiSettings {
                api_key: resolve(&self.openai.api_key, &self.openai.api_key_env),
                api_key_env: self.openai.api_key_env.clone(),
                base_url: self.openai.base_url.clone(),
            },
            anthropic: AnthropicSettings {
                api_key: resolve(&self.anthropic.api_key, &self.anthropic.api_key_env),
                api_key_env: self.anthropic.api_key_env.clone(),
                base_url: self.anthropic.base_url.clone(),
                api_version: self.anthropic.api_version.clone(),
            },
        }
    }
}
