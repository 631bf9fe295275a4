//! Error policy configuration value objects

use crate::core::error::DomainError;
use crate::speaker::entities::ProviderKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a failed provider call is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStrategy {
    /// Re-run the call with exponential backoff
    #[default]
    Retry,
    /// Re-run the call once on another provider kind
    Fallback,
    /// Stop the whole conversation
    Abort,
    /// Record a placeholder turn and move on
    Continue,
}

impl ErrorStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStrategy::Retry => "retry",
            ErrorStrategy::Fallback => "fallback",
            ErrorStrategy::Abort => "abort",
            ErrorStrategy::Continue => "continue",
        }
    }
}

impl std::fmt::Display for ErrorStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ErrorStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "retry" => Ok(ErrorStrategy::Retry),
            "fallback" => Ok(ErrorStrategy::Fallback),
            "abort" => Ok(ErrorStrategy::Abort),
            "continue" => Ok(ErrorStrategy::Continue),
            other => Err(DomainError::InvalidPolicy(format!(
                "unknown strategy '{}' (expected retry, fallback, abort or continue)",
                other
            ))),
        }
    }
}

/// Configured resilience behaviour (Value Object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPolicyConfig {
    pub strategy: ErrorStrategy,
    /// Total attempts under `retry`, first attempt included
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub fallback_provider: Option<ProviderKind>,
}

impl Default for ErrorPolicyConfig {
    fn default() -> Self {
        Self {
            strategy: ErrorStrategy::Retry,
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            fallback_provider: None,
        }
    }
}

impl ErrorPolicyConfig {
    pub fn new(strategy: ErrorStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn retry(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            strategy: ErrorStrategy::Retry,
            max_retries,
            initial_delay,
            fallback_provider: None,
        }
    }

    pub fn fallback(kind: impl Into<ProviderKind>) -> Self {
        Self {
            strategy: ErrorStrategy::Fallback,
            fallback_provider: Some(kind.into()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_retries == 0 {
            return Err(DomainError::InvalidPolicy(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if self.strategy == ErrorStrategy::Fallback && self.fallback_provider.is_none() {
            return Err(DomainError::InvalidPolicy(
                "fallback strategy requires fallback_provider".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ErrorPolicyConfig::default();
        assert_eq!(config.strategy, ErrorStrategy::Retry);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_delay, Duration::from_millis(1000));
        assert!(config.fallback_provider.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("Continue".parse::<ErrorStrategy>().unwrap(), ErrorStrategy::Continue);
        assert_eq!("abort".parse::<ErrorStrategy>().unwrap(), ErrorStrategy::Abort);
        assert!("ignore".parse::<ErrorStrategy>().is_err());
    }

    #[test]
    fn test_fallback_without_kind_is_invalid() {
        let config = ErrorPolicyConfig::new(ErrorStrategy::Fallback);
        assert!(matches!(
            config.validate(),
            Err(DomainError::InvalidPolicy(_))
        ));
        assert!(ErrorPolicyConfig::fallback("anthropic").validate().is_ok());
    }

    #[test]
    fn test_zero_retries_is_invalid() {
        let config = ErrorPolicyConfig::retry(0, Duration::from_millis(10));
        assert!(config.validate().is_err());
    }
}
