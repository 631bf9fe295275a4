//! A conversation whose primary backend is down, served by the fallback
//! backend over real HTTP.

use colloquy_application::{RunConversationError, RunConversationInput, RunConversationUseCase};
use colloquy_domain::{
    CharacterDefinition, CharacterParams, ConversationSettings, ConversationStatus,
    ErrorPolicyConfig, SpeakerDefinition, SpeakerRoster,
};
use colloquy_infrastructure::{
    AnthropicSettings, OpenAiSettings, ProviderSettings, builtin_registry,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn roster() -> SpeakerRoster {
    let params = CharacterParams {
        temperature: Some(0.4),
        max_tokens: Some(150),
        frequency_penalty: Some(0.5),
        presence_penalty: Some(0.5),
        ..Default::default()
    };
    SpeakerRoster::new(vec![
        SpeakerDefinition::new(
            "alice",
            "openai",
            "gpt-4o-mini",
            CharacterDefinition::new("You are Alice.")
                .with_display_name("Alice")
                .with_params(params),
        ),
        SpeakerDefinition::new(
            "bob",
            "openai",
            "gpt-4o",
            CharacterDefinition::new("You are Bob.").with_display_name("Bob"),
        ),
    ])
    .unwrap()
}

#[tokio::test]
async fn failing_primary_falls_back_once_per_turn_with_anthropic_shape() {
    let openai_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(2)
        .mount(&openai_server)
        .await;

    let anthropic_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "Fallback speaking."}]
        })))
        .expect(2)
        .mount(&anthropic_server)
        .await;

    let settings = ProviderSettings {
        request_timeout: Duration::from_secs(5),
        openai: OpenAiSettings {
            api_key: Some("sk-test".into()),
            base_url: openai_server.uri(),
            ..Default::default()
        },
        anthropic: AnthropicSettings {
            api_key: Some("ant-test".into()),
            base_url: anthropic_server.uri(),
            ..Default::default()
        },
    };
    let registry = Arc::new(builtin_registry(settings).unwrap());
    let use_case = RunConversationUseCase::new(registry, ErrorPolicyConfig::fallback("anthropic"));

    let output = use_case
        .execute(RunConversationInput::new(
            roster(),
            ConversationSettings::new("Should cities ban cars?", 2, "alice"),
        ))
        .await
        .unwrap();

    assert_eq!(output.status, ConversationStatus::Completed);
    assert_eq!(output.transcript.len(), 2);
    assert!(
        output
            .transcript
            .iter()
            .all(|t| t.response() == "Fallback speaking.")
    );

    let requests = anthropic_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let first: Value = requests[0].body_json().unwrap();
    assert_eq!(first["model"], "gpt-4o-mini");
    assert_eq!(first["system"], "You are Alice.");
    assert_eq!(first["temperature"], 0.4);
    assert_eq!(first["max_tokens"], 150);
    assert!(first.get("frequency_penalty").is_none());
    assert!(first.get("presence_penalty").is_none());

    let second: Value = requests[1].body_json().unwrap();
    assert_eq!(second["model"], "gpt-4o");
    assert!(
        second["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("Alice: Fallback speaking.")
    );
}

#[tokio::test]
async fn missing_fallback_key_fails_before_any_request() {
    let openai_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Hi."}}]
        })))
        .expect(0)
        .mount(&openai_server)
        .await;

    let settings = ProviderSettings {
        request_timeout: Duration::from_secs(5),
        openai: OpenAiSettings {
            api_key: Some("sk-test".into()),
            base_url: openai_server.uri(),
            ..Default::default()
        },
        anthropic: AnthropicSettings {
            api_key: None,
            ..Default::default()
        },
    };
    let registry = Arc::new(builtin_registry(settings).unwrap());
    let use_case = RunConversationUseCase::new(registry, ErrorPolicyConfig::fallback("anthropic"));

    let err = use_case
        .execute(RunConversationInput::new(
            roster(),
            ConversationSettings::new("Should cities ban cars?", 2, "alice"),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, RunConversationError::ProviderSetup { .. }));
    assert!(err.partial_transcript().is_none());
}
