//! Test doubles shared by the application tests

use crate::ports::provider::{LlmProvider, ProviderError};
use crate::ports::sleeper::{SleepCancelled, Sleeper};
use crate::services::provider_registry::ProviderRegistry;
use async_trait::async_trait;
use colloquy_domain::{CharacterDefinition, GenerationParams, ProviderKind, SpeakerDefinition};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub prompt: String,
    pub params: GenerationParams,
    pub system_prompt: Option<String>,
}

enum WhenExhausted {
    Reply,
    Fail,
}

/// Provider that plays back a script, then replies or fails forever
pub(crate) struct ScriptedProvider {
    kind: ProviderKind,
    supports_penalties: bool,
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    when_exhausted: WhenExhausted,
    pub calls: Mutex<Vec<RecordedCall>>,
    pub constructed_for: Mutex<Vec<SpeakerDefinition>>,
}

impl ScriptedProvider {
    fn build(kind: &str, script: Vec<Result<String, ProviderError>>, when_exhausted: WhenExhausted) -> Self {
        let kind = ProviderKind::new(kind);
        Self {
            supports_penalties: kind != ProviderKind::anthropic(),
            kind,
            script: Mutex::new(script.into()),
            when_exhausted,
            calls: Mutex::new(Vec::new()),
            constructed_for: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(kind: &str) -> Self {
        Self::build(kind, Vec::new(), WhenExhausted::Reply)
    }

    pub fn failing(kind: &str) -> Self {
        Self::build(kind, Vec::new(), WhenExhausted::Fail)
    }

    pub fn scripted(kind: &str, script: Vec<Result<String, ProviderError>>) -> Self {
        Self::build(kind, script, WhenExhausted::Reply)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn kind(&self) -> &ProviderKind {
        &self.kind
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    fn map_character_params(&self, character: &CharacterDefinition) -> GenerationParams {
        if self.supports_penalties {
            GenerationParams::with_penalties(&character.params)
        } else {
            GenerationParams::without_penalties(&character.params)
        }
    }

    async fn generate_response(
        &self,
        prompt: &str,
        params: &GenerationParams,
        system_prompt: Option<&str>,
    ) -> Result<String, ProviderError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                params: *params,
                system_prompt: system_prompt.map(str::to_string),
            });
            calls.len()
        };
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        match self.when_exhausted {
            WhenExhausted::Reply => Ok(format!("{} reply {}", self.kind, n)),
            WhenExhausted::Fail => Err(ProviderError::Network(format!(
                "{} unreachable (call {})",
                self.kind, n
            ))),
        }
    }
}

/// Registry serving the given providers by their kind
pub(crate) fn registry_with(providers: &[Arc<ScriptedProvider>]) -> Arc<ProviderRegistry> {
    let registry = ProviderRegistry::new();
    for provider in providers {
        let provider = Arc::clone(provider);
        registry.register(provider.kind.clone(), move |speaker: &SpeakerDefinition| {
            provider.constructed_for.lock().unwrap().push(speaker.clone());
            Ok(Arc::clone(&provider) as Arc<dyn LlmProvider>)
        });
    }
    Arc::new(registry)
}

/// Sleeper that records requested delays without waiting
#[derive(Default)]
pub(crate) struct RecordingSleeper {
    pub slept: Mutex<Vec<Duration>>,
    cancel_on_sleep: Option<CancellationToken>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel `token` the first time anyone sleeps
    pub fn cancelling(token: CancellationToken) -> Self {
        Self {
            slept: Mutex::new(Vec::new()),
            cancel_on_sleep: Some(token),
        }
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(
        &self,
        duration: Duration,
        cancellation: &CancellationToken,
    ) -> Result<(), SleepCancelled> {
        self.slept.lock().unwrap().push(duration);
        if let Some(token) = &self.cancel_on_sleep {
            token.cancel();
        }
        if cancellation.is_cancelled() {
            Err(SleepCancelled)
        } else {
            Ok(())
        }
    }
}
