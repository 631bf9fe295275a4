//! Error policy from TOML (`[error_handling]` section)

use colloquy_domain::{DomainError, ErrorPolicyConfig, ErrorStrategy, ProviderKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileErrorHandlingConfig {
    /// retry | fallback | abort | continue
    pub strategy: String,
    /// Total attempts under `retry`
    #[serde(alias = "maxRetries")]
    pub max_retries: u32,
    #[serde(alias = "initialDelay")]
    pub initial_delay_ms: u64,
    #[serde(alias = "fallbackProvider")]
    pub fallback_provider: Option<String>,
}

impl Default for FileErrorHandlingConfig {
    fn default() -> Self {
        Self {
            strategy: "retry".to_string(),
            max_retries: 3,
            initial_delay_ms: 1000,
            fallback_provider: None,
        }
    }
}

impl FileErrorHandlingConfig {
    pub fn to_policy(&self) -> Result<ErrorPolicyConfig, DomainError> {
        let strategy: ErrorStrategy = self.strategy.parse()?;
        let policy = ErrorPolicyConfig {
            strategy,
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            fallback_provider: self
                .fallback_provider
                .as_deref()
                .filter(|k| !k.trim().is_empty())
                .map(ProviderKind::new),
        };
        policy.validate()?;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = FileErrorHandlingConfig::default().to_policy().unwrap();
        assert_eq!(policy, ErrorPolicyConfig::default());
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let config = FileErrorHandlingConfig {
            strategy: "shrug".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.to_policy(),
            Err(DomainError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn test_fallback_needs_provider() {
        let config = FileErrorHandlingConfig {
            strategy: "fallback".into(),
            fallback_provider: Some(" ".into()),
            ..Default::default()
        };
        assert!(config.to_policy().is_err());

        let config = FileErrorHandlingConfig {
            strategy: "fallback".into(),
            fallback_provider: Some("Anthropic".into()),
            ..Default::default()
        };
        assert_eq!(
            config.to_policy().unwrap().fallback_provider,
            Some(ProviderKind::anthropic())
        );
    }
}
