//! Domain layer for colloquy
//!
//! This crate contains the entities, value objects and pure rules of a
//! turn-based dialogue between LLM-backed characters. It has no
//! dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Speaker**: a configured identity bound to a provider kind, model and character
//! - **Turn**: one speaker's contribution; turns form an append-only [`Transcript`]
//! - **Round-robin**: rotation follows configuration order, starting at the first speaker
//! - **Prompt**: every prompt restates the topic and replays the whole transcript

pub mod config;
pub mod conversation;
pub mod core;
pub mod policy;
pub mod prompt;
pub mod speaker;

// Re-export commonly used types
pub use config::OutputFormat;
pub use conversation::{
    settings::ConversationSettings, status::ConversationStatus, transcript::Transcript,
    turn::Turn,
};
pub use core::{error::DomainError, string::preview};
pub use policy::{
    backoff::BackoffSchedule,
    config::{ErrorPolicyConfig, ErrorStrategy},
};
pub use prompt::PromptBuilder;
pub use speaker::{
    character::{CharacterDefinition, CharacterParams, GenerationParams},
    entities::{ProviderKind, SpeakerDefinition, SpeakerId},
    roster::SpeakerRoster,
};
