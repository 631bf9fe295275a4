//! Shared HTTP plumbing for the provider adapters

use colloquy_application::ProviderError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Map a transport failure. Anything that produced no HTTP response is a
/// network error, timeouts included.
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Network(format!("request timed out: {err}"))
    } else {
        ProviderError::Network(err.to_string())
    }
}

/// POST `body` as JSON and decode a successful response.
///
/// Non-2xx statuses become [`ProviderError::BadStatus`] carrying the raw body.
pub(crate) async fn post_json<B, R>(
    request: reqwest::RequestBuilder,
    body: &B,
    backend: &str,
) -> Result<R, ProviderError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = request
        .json(body)
        .send()
        .await
        .map_err(map_reqwest_error)?;

    let status = response.status();
    let text = response.text().await.map_err(map_reqwest_error)?;

    if !status.is_success() {
        tracing::debug!(backend, status = status.as_u16(), "Non-success response");
        return Err(ProviderError::BadStatus {
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str(&text).map_err(|e| {
        ProviderError::EmptyContent(format!("{backend} returned an unreadable body: {e}"))
    })
}

/// Resolve an API key or explain where it should come from.
pub(crate) fn require_key(
    key: Option<&str>,
    env_var: &str,
    backend: &str,
) -> Result<String, ProviderError> {
    match key.map(str::trim) {
        Some(k) if !k.is_empty() => Ok(k.to_string()),
        _ => Err(ProviderError::Configuration(format!(
            "{backend} API key is not set (export {env_var} or set api_key in the config)"
        ))),
    }
}
