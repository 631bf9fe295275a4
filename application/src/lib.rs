//! Application layer for colloquy
//!
//! This crate contains the conversation use case, the error policy, the
//! provider registry and the ports adapters implement. It depends only on
//! the domain layer.

pub mod ports;
pub mod services;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{ConversationProgress, NoProgress},
    provider::{LlmProvider, ProviderError},
    sleeper::{SleepCancelled, Sleeper, TokioSleeper},
};
pub use services::{
    error_policy::{ErrorPolicy, PolicyError, PolicyOutcome, TurnRequest},
    provider_registry::{ProviderConstructor, ProviderRegistry},
};
pub use use_cases::run_conversation::{
    RunConversationError, RunConversationInput, RunConversationOutput, RunConversationUseCase,
};
