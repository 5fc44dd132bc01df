//! HTTP plumbing shared by the network-backed adapters.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::{ProviderError, RawFailure};
use super::provider::ProviderInfo;

/// Build the client an adapter keeps for its lifetime.
pub(crate) fn build_client(info: &ProviderInfo, timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::config(info.id, format!("failed to build HTTP client: {e}")))
}

/// Send a request and return the body of a successful response.
///
/// Non-success responses become a [`RawFailure`] of the form
/// `"{status}: {body}"`, carrying the `Retry-After` seconds if present.
pub(crate) async fn send(request: RequestBuilder) -> Result<String, RawFailure> {
    let resp = request.send().await?;
    let status = resp.status();

    if !status.is_success() {
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        let body = resp.text().await.unwrap_or_default();
        return Err(RawFailure::new(format!("{status}: {}", body.trim())).with_retry_after(retry_after));
    }

    Ok(resp.text().await?)
}

/// Decode a response body, or `None` (logged) when it has an unexpected shape.
pub(crate) fn decode<T: DeserializeOwned>(info: &ProviderInfo, body: &str) -> Option<T> {
    match serde_json::from_str(body) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(provider = %info.id, error = %e, "unexpected response body, using default suggestions");
            None
        }
    }
}
