//! Error policy: wraps one provider call in the configured resilience strategy
//!
//! | Strategy   | On failure                                                   |
//! |------------|--------------------------------------------------------------|
//! | `retry`    | re-run on the same provider, doubling the delay each time    |
//! | `fallback` | re-run once on a provider of the configured fallback kind    |
//! | `abort`    | surface the provider error; the conversation halts           |
//! | `continue` | log it and hand back "no result"; the turn gets a placeholder |

use crate::ports::provider::{LlmProvider, ProviderError};
use crate::ports::sleeper::Sleeper;
use crate::services::provider_registry::ProviderRegistry;
use colloquy_domain::{
    BackoffSchedule, ErrorPolicyConfig, ErrorStrategy, ProviderKind, SpeakerDefinition,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Operation name attached to every policy log record
const OPERATION: &str = "generate_response";

/// One provider call: who speaks and what they are asked
#[derive(Debug, Clone, Copy)]
pub struct TurnRequest<'a> {
    pub speaker: &'a SpeakerDefinition,
    pub prompt: &'a str,
}

impl<'a> TurnRequest<'a> {
    pub fn new(speaker: &'a SpeakerDefinition, prompt: &'a str) -> Self {
        Self { speaker, prompt }
    }

    async fn send(&self, provider: &dyn LlmProvider) -> Result<String, ProviderError> {
        let params = provider.map_character_params(&self.speaker.character);
        provider
            .generate_response(self.prompt, &params, self.speaker.character.system_prompt())
            .await
    }
}

/// What a guarded call produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyOutcome {
    Response(String),
    /// `continue` strategy swallowed a failure
    NoResult { reason: String },
}

/// Failures the policy could not absorb
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("All {attempts} attempts failed. Last error: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: ProviderError,
    },

    #[error("Provider call failed: {0}")]
    Aborted(#[source] ProviderError),

    #[error("Fallback provider {kind} also failed: {source}")]
    FallbackFailed {
        kind: ProviderKind,
        source: ProviderError,
    },

    #[error("Error policy misconfigured: {0}")]
    Configuration(String),

    #[error("Cancelled while handling provider error")]
    Cancelled,
}

impl PolicyError {
    /// The provider error that ended the call, if there was one
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            PolicyError::RetriesExhausted { last, .. } => Some(last),
            PolicyError::Aborted(e) => Some(e),
            PolicyError::FallbackFailed { source, .. } => Some(source),
            PolicyError::Configuration(_) | PolicyError::Cancelled => None,
        }
    }
}

/// Applies an [`ErrorPolicyConfig`] to provider calls
pub struct ErrorPolicy {
    config: ErrorPolicyConfig,
    registry: Arc<ProviderRegistry>,
    sleeper: Arc<dyn Sleeper>,
    cancellation: CancellationToken,
}

impl ErrorPolicy {
    pub fn new(
        config: ErrorPolicyConfig,
        registry: Arc<ProviderRegistry>,
        sleeper: Arc<dyn Sleeper>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            config,
            registry,
            sleeper,
            cancellation,
        }
    }

    pub fn config(&self) -> &ErrorPolicyConfig {
        &self.config
    }

    /// Run the request against `provider`, applying the strategy on failure.
    pub async fn invoke(
        &self,
        provider: &dyn LlmProvider,
        request: &TurnRequest<'_>,
    ) -> Result<PolicyOutcome, PolicyError> {
        let error = match request.send(provider).await {
            Ok(text) => return Ok(PolicyOutcome::Response(text)),
            Err(e) => e,
        };

        error!(
            provider = %provider.kind(),
            model = provider.model(),
            speaker = %request.speaker.id,
            operation = OPERATION,
            strategy = %self.config.strategy,
            error = %error,
            "Provider call failed"
        );

        match self.config.strategy {
            ErrorStrategy::Retry => self.retry_with_backoff(provider, request, error).await,
            ErrorStrategy::Fallback => self.switch_provider(provider, request, error).await,
            ErrorStrategy::Abort => Err(PolicyError::Aborted(error)),
            ErrorStrategy::Continue => {
                warn!(
                    speaker = %request.speaker.id,
                    "Continuing without a response for this turn"
                );
                Ok(PolicyOutcome::NoResult {
                    reason: error.to_string(),
                })
            }
        }
    }

    /// Attempts `2..=max_retries`; the call that just failed was attempt 1.
    async fn retry_with_backoff(
        &self,
        provider: &dyn LlmProvider,
        request: &TurnRequest<'_>,
        first_error: ProviderError,
    ) -> Result<PolicyOutcome, PolicyError> {
        let max_attempts = self.config.max_retries;
        let schedule = BackoffSchedule::new(self.config.initial_delay);
        let mut last = first_error;

        for attempt in 2..=max_attempts {
            let delay = schedule.delay(attempt - 2);
            info!(
                provider = %provider.kind(),
                model = provider.model(),
                operation = OPERATION,
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                "Retrying after backoff"
            );
            self.sleeper
                .sleep(delay, &self.cancellation)
                .await
                .map_err(|_| PolicyError::Cancelled)?;

            match request.send(provider).await {
                Ok(text) => {
                    info!(attempt, "Retry succeeded");
                    return Ok(PolicyOutcome::Response(text));
                }
                Err(e) => {
                    warn!(
                        provider = %provider.kind(),
                        model = provider.model(),
                        operation = OPERATION,
                        attempt,
                        error = %e,
                        "Retry attempt failed"
                    );
                    last = e;
                }
            }
        }

        Err(PolicyError::RetriesExhausted {
            attempts: max_attempts,
            last,
        })
    }

    /// One attempt on the fallback kind with the same model and character.
    async fn switch_provider(
        &self,
        provider: &dyn LlmProvider,
        request: &TurnRequest<'_>,
        original: ProviderError,
    ) -> Result<PolicyOutcome, PolicyError> {
        let Some(kind) = self.config.fallback_provider.clone() else {
            return Err(PolicyError::Configuration(format!(
                "no fallback provider configured (original error: {})",
                original
            )));
        };

        info!(
            from = %provider.kind(),
            to = %kind,
            model = %request.speaker.model,
            operation = OPERATION,
            "Switching to fallback provider"
        );

        let substitute = request.speaker.with_provider_kind(kind.clone());
        let fallback = self
            .registry
            .create(&substitute)
            .map_err(|e| PolicyError::Configuration(e.to_string()))?;

        TurnRequest::new(&substitute, request.prompt)
            .send(fallback.as_ref())
            .await
            .map(PolicyOutcome::Response)
            .map_err(|source| {
                error!(
                    provider = %kind,
                    model = fallback.model(),
                    operation = OPERATION,
                    error = %source,
                    "Fallback provider failed"
                );
                PolicyError::FallbackFailed { kind, source }
            })
    }
}
