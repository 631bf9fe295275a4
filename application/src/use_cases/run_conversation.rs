//! Run Conversation use case
//!
//! Drives a turn-based dialogue: picks the speaker for each turn in
//! rotation, builds the prompt from the history so far, calls the speaker's
//! provider through the error policy and appends the result to the
//! transcript.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{ConversationProgress, NoProgress};
use crate::ports::provider::{LlmProvider, ProviderError};
use crate::ports::sleeper::{Sleeper, TokioSleeper};
use crate::services::error_policy::{ErrorPolicy, PolicyError, PolicyOutcome, TurnRequest};
use crate::services::provider_registry::ProviderRegistry;
use colloquy_domain::{
    ConversationSettings, ConversationStatus, DomainError, ErrorPolicyConfig, ErrorStrategy,
    PromptBuilder, SpeakerDefinition, SpeakerId, SpeakerRoster, Transcript, Turn,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Errors that end a conversation early
#[derive(Error, Debug)]
pub enum RunConversationError {
    #[error("Invalid conversation configuration: {0}")]
    InvalidConfiguration(#[from] DomainError),

    #[error("Failed to set up provider for speaker '{speaker}': {source}")]
    ProviderSetup {
        speaker: SpeakerId,
        source: ProviderError,
    },

    #[error("Conversation aborted at turn {turn}: {source}")]
    Aborted {
        turn: u32,
        transcript: Transcript,
        source: PolicyError,
    },

    #[error("Conversation cancelled after {} completed turns", .transcript.len())]
    Cancelled { transcript: Transcript },
}

impl RunConversationError {
    /// Turns completed before the run stopped, if it got that far
    pub fn partial_transcript(&self) -> Option<&Transcript> {
        match self {
            RunConversationError::Aborted { transcript, .. }
            | RunConversationError::Cancelled { transcript } => Some(transcript),
            _ => None,
        }
    }

    pub fn into_partial_transcript(self) -> Option<Transcript> {
        match self {
            RunConversationError::Aborted { transcript, .. }
            | RunConversationError::Cancelled { transcript } => Some(transcript),
            _ => None,
        }
    }

    /// Terminal status the run reached, `None` if it never started
    pub fn status(&self) -> Option<ConversationStatus> {
        match self {
            RunConversationError::Aborted { .. } => Some(ConversationStatus::Aborted),
            RunConversationError::Cancelled { .. } => Some(ConversationStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunConversationError::Cancelled { .. })
    }
}

/// Input for the RunConversation use case
#[derive(Debug, Clone)]
pub struct RunConversationInput {
    pub roster: SpeakerRoster,
    pub settings: ConversationSettings,
}

impl RunConversationInput {
    pub fn new(roster: SpeakerRoster, settings: ConversationSettings) -> Self {
        Self { roster, settings }
    }
}

/// Result of a conversation that ran every turn
#[derive(Debug, Clone)]
pub struct RunConversationOutput {
    pub transcript: Transcript,
    pub status: ConversationStatus,
}

/// Use case for running a conversation between configured speakers
pub struct RunConversationUseCase {
    registry: Arc<ProviderRegistry>,
    policy_config: ErrorPolicyConfig,
    sleeper: Arc<dyn Sleeper>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation: CancellationToken,
}

impl RunConversationUseCase {
    pub fn new(registry: Arc<ProviderRegistry>, policy_config: ErrorPolicyConfig) -> Self {
        Self {
            registry,
            policy_config,
            sleeper: Arc::new(TokioSleeper),
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Token that stops the run at the next turn boundary or wait
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunConversationInput,
    ) -> Result<RunConversationOutput, RunConversationError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunConversationInput,
        progress: &dyn ConversationProgress,
    ) -> Result<RunConversationOutput, RunConversationError> {
        let RunConversationInput { roster, settings } = input;

        self.validate(&roster, &settings)?;
        let providers = self.build_providers(&roster)?;

        let policy = ErrorPolicy::new(
            self.policy_config.clone(),
            Arc::clone(&self.registry),
            Arc::clone(&self.sleeper),
            self.cancellation.clone(),
        );
        let builder = PromptBuilder::new(&roster);
        let mut transcript = Transcript::with_capacity(settings.num_turns);
        let mut status = ConversationStatus::NotStarted;
        advance(&mut status, ConversationStatus::Running);

        info!(
            topic = %settings.topic,
            turns = settings.num_turns,
            speakers = roster.len(),
            first_speaker = %settings.first_speaker,
            strategy = %self.policy_config.strategy,
            "Starting conversation"
        );
        progress.on_conversation_start(&settings, &roster);
        self.conversation_logger
            .log(ConversationEvent::conversation_started(&settings, &roster));

        for turn_number in 1..=settings.num_turns {
            if self.cancellation.is_cancelled() {
                return Err(self.cancelled(&mut status, transcript, progress));
            }

            let speaker = roster.speaker_for_turn(turn_number, &settings.first_speaker)?;
            let provider = providers.get(&speaker.id).cloned().ok_or_else(|| {
                DomainError::UnknownSpeaker(speaker.id.to_string())
            })?;
            let prompt = builder.build(&speaker.id, transcript.turns(), &settings.topic);

            debug!(turn = turn_number, speaker = %speaker.id, "Prompt built:\n{}", prompt);
            progress.on_turn_start(turn_number, settings.num_turns, speaker);

            let started = Instant::now();
            let outcome = {
                let request = TurnRequest::new(speaker, &prompt);
                tokio::select! {
                    biased;
                    _ = self.cancellation.cancelled() => Err(PolicyError::Cancelled),
                    result = policy.invoke(provider.as_ref(), &request) => result,
                }
            };
            let elapsed = started.elapsed();

            let turn = match outcome {
                Ok(PolicyOutcome::Response(text)) => {
                    info!(
                        turn = turn_number,
                        speaker = %speaker.id,
                        elapsed_ms = elapsed.as_millis() as u64,
                        chars = text.chars().count(),
                        "Turn completed"
                    );
                    Turn::new(turn_number, speaker.id.clone(), prompt, text)
                }
                Ok(PolicyOutcome::NoResult { reason }) => {
                    self.turn_failed(turn_number, speaker, &reason, progress);
                    Turn::placeholder(turn_number, speaker.id.clone(), prompt, &reason)
                }
                Err(PolicyError::Cancelled) => {
                    return Err(self.cancelled(&mut status, transcript, progress));
                }
                Err(e @ PolicyError::Aborted(_)) => {
                    error!(
                        turn = turn_number,
                        speaker = %speaker.id,
                        error = %e,
                        "Conversation aborted"
                    );
                    self.turn_failed(turn_number, speaker, &e.to_string(), progress);
                    self.finish(&mut status, ConversationStatus::Aborted, &transcript, progress);
                    return Err(RunConversationError::Aborted {
                        turn: turn_number,
                        transcript,
                        source: e,
                    });
                }
                // Retry and fallback give up on the turn, not the conversation
                Err(e) => {
                    let reason = e.to_string();
                    self.turn_failed(turn_number, speaker, &reason, progress);
                    Turn::placeholder(turn_number, speaker.id.clone(), prompt, &reason)
                }
            };

            transcript.push(turn.clone())?;
            progress.on_turn_complete(&turn, speaker, elapsed);
            self.conversation_logger
                .log(ConversationEvent::turn_completed(&turn, speaker, elapsed));

            let delay = settings.delay_between_turns;
            if turn_number < settings.num_turns && !delay.is_zero() {
                progress.on_delay(delay);
                if self.sleeper.sleep(delay, &self.cancellation).await.is_err() {
                    return Err(self.cancelled(&mut status, transcript, progress));
                }
            }
        }

        self.finish(&mut status, ConversationStatus::Completed, &transcript, progress);
        info!(turns = transcript.len(), "Conversation completed");

        Ok(RunConversationOutput { transcript, status })
    }

    fn validate(
        &self,
        roster: &SpeakerRoster,
        settings: &ConversationSettings,
    ) -> Result<(), RunConversationError> {
        settings.validate(roster)?;
        self.policy_config.validate()?;

        if self.policy_config.strategy == ErrorStrategy::Fallback
            && let Some(kind) = &self.policy_config.fallback_provider
            && !self.registry.is_supported(kind.as_str())
        {
            return Err(DomainError::InvalidPolicy(format!(
                "fallback provider '{}' is not a registered provider type",
                kind
            ))
            .into());
        }
        Ok(())
    }

    /// Build every speaker's provider before the first turn so setup
    /// problems surface immediately.
    ///
    /// Under the fallback strategy the fallback provider is built for each
    /// speaker too, so missing fallback credentials fail here rather than
    /// in the middle of a turn.
    fn build_providers(
        &self,
        roster: &SpeakerRoster,
    ) -> Result<HashMap<SpeakerId, Arc<dyn LlmProvider>>, RunConversationError> {
        let fallback_kind = match self.policy_config.strategy {
            ErrorStrategy::Fallback => self.policy_config.fallback_provider.as_ref(),
            _ => None,
        };

        roster
            .iter()
            .map(|speaker| {
                let provider = self.create_provider(speaker)?;
                debug!(
                    speaker = %speaker.id,
                    provider = %provider.kind(),
                    model = provider.model(),
                    "Provider ready"
                );
                if let Some(kind) = fallback_kind {
                    let fallback = self.create_provider(&speaker.with_provider_kind(kind.clone()))?;
                    debug!(
                        speaker = %speaker.id,
                        provider = %fallback.kind(),
                        "Fallback provider ready"
                    );
                }
                Ok((speaker.id.clone(), provider))
            })
            .collect()
    }

    fn create_provider(
        &self,
        speaker: &SpeakerDefinition,
    ) -> Result<Arc<dyn LlmProvider>, RunConversationError> {
        self.registry
            .create(speaker)
            .map_err(|source| RunConversationError::ProviderSetup {
                speaker: speaker.id.clone(),
                source,
            })
    }

    fn turn_failed(
        &self,
        turn_number: u32,
        speaker: &SpeakerDefinition,
        reason: &str,
        progress: &dyn ConversationProgress,
    ) {
        warn!(
            turn = turn_number,
            speaker = %speaker.id,
            reason = %reason,
            "Turn produced no response"
        );
        progress.on_turn_failed(turn_number, speaker, reason);
        self.conversation_logger
            .log(ConversationEvent::turn_failed(turn_number, speaker, reason));
    }

    fn finish(
        &self,
        status: &mut ConversationStatus,
        next: ConversationStatus,
        transcript: &Transcript,
        progress: &dyn ConversationProgress,
    ) {
        advance(status, next);
        progress.on_conversation_end(*status, transcript);
        self.conversation_logger.log(ConversationEvent::conversation_finished(
            *status,
            transcript.len(),
        ));
    }

    fn cancelled(
        &self,
        status: &mut ConversationStatus,
        transcript: Transcript,
        progress: &dyn ConversationProgress,
    ) -> RunConversationError {
        warn!(turns = transcript.len(), "Conversation cancelled");
        self.finish(status, ConversationStatus::Cancelled, &transcript, progress);
        RunConversationError::Cancelled { transcript }
    }
}

fn advance(status: &mut ConversationStatus, next: ConversationStatus) {
    debug_assert!(
        status.can_transition_to(next),
        "illegal status transition {} -> {}",
        status,
        next
    );
    *status = next;
}
