//! Provider registry
//!
//! Maps provider-kind strings to constructors. The registry is the single
//! place where a [`SpeakerDefinition`] becomes a live [`LlmProvider`].

use crate::ports::provider::{LlmProvider, ProviderError};
use colloquy_domain::{ProviderKind, SpeakerDefinition};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Builds a provider for one speaker
pub type ProviderConstructor =
    Arc<dyn Fn(&SpeakerDefinition) -> Result<Arc<dyn LlmProvider>, ProviderError> + Send + Sync>;

/// Kind-to-constructor lookup, safe to share across tasks
///
/// Registering a kind that already exists replaces the previous constructor.
#[derive(Default)]
pub struct ProviderRegistry {
    constructors: RwLock<HashMap<ProviderKind, ProviderConstructor>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, kind: impl Into<ProviderKind>, constructor: F)
    where
        F: Fn(&SpeakerDefinition) -> Result<Arc<dyn LlmProvider>, ProviderError>
            + Send
            + Sync
            + 'static,
    {
        let kind = kind.into();
        tracing::debug!(kind = %kind, "Registering provider");
        self.constructors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, Arc::new(constructor));
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<F>(self, kind: impl Into<ProviderKind>, constructor: F) -> Self
    where
        F: Fn(&SpeakerDefinition) -> Result<Arc<dyn LlmProvider>, ProviderError>
            + Send
            + Sync
            + 'static,
    {
        self.register(kind, constructor);
        self
    }

    /// Whether `kind` has a constructor (case-insensitive)
    pub fn is_supported(&self, kind: &str) -> bool {
        self.constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&ProviderKind::new(kind))
    }

    /// Registered kinds, sorted
    pub fn supported_kinds(&self) -> Vec<ProviderKind> {
        let mut kinds: Vec<ProviderKind> = self
            .constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        kinds.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        kinds
    }

    /// Construct a provider for `speaker` from its provider kind.
    pub fn create(&self, speaker: &SpeakerDefinition) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        // Clone the constructor out so the lock is not held while it runs
        let constructor = self
            .constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&speaker.provider_kind)
            .cloned();

        match constructor {
            Some(constructor) => constructor(speaker),
            None => {
                let supported: Vec<String> = self
                    .supported_kinds()
                    .iter()
                    .map(|k| k.to_string())
                    .collect();
                Err(ProviderError::Configuration(format!(
                    "Unsupported provider type: {} (supported: {})",
                    speaker.provider_kind,
                    if supported.is_empty() {
                        "none".to_string()
                    } else {
                        supported.join(", ")
                    }
                )))
            }
        }
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("kinds", &self.supported_kinds())
            .finish()
    }
}
