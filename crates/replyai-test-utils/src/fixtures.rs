//! Canned requests and provider settings.

use replyai_config::ProviderConfig;
use replyai_core::SuggestRequest;

/// Credential used by [`mock_provider_config`].
pub const TEST_API_KEY: &str = "test-api-key";

/// An environment with no variables set.
pub fn no_env(_: &str) -> Option<String> {
    None
}

/// A typical request using the default modes and intensity.
pub fn sample_request() -> SuggestRequest {
    SuggestRequest::new("test-user", "Are we still on for lunch tomorrow?")
}

/// Provider settings pointing at a mock backend, with a short timeout.
pub fn mock_provider_config(endpoint_url: &str) -> ProviderConfig {
    ProviderConfig {
        endpoint_url: Some(endpoint_url.to_string()),
        timeout_seconds: Some(2),
        ..ProviderConfig::with_api_key(TEST_API_KEY)
    }
}
