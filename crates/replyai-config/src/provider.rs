//! Per-backend provider settings.
//!
//! Every field is optional: each adapter fills in its own defaults for
//! whatever the operator leaves out, and validates the result once when
//! the adapter is constructed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Settings for a single text-generation backend.
///
/// ## TOML Example
///
/// ```toml
/// [providers.openrouter]
/// model_name = "meta-llama/llama-3.2-3b-instruct:free"
/// temperature = 0.9
/// max_tokens = 200
/// timeout_seconds = 20
/// ```
///
/// The credential may be given as `api_key`, but the usual place for it is
/// the provider's environment variable (`GEMINI_API_KEY`,
/// `OPENROUTER_API_KEY`, `DASHSCOPE_API_KEY`).
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Explicit credential. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL override for the backend's API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,

    /// Model identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Sampling temperature (0.0–2.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Maximum number of output tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Upper bound on a single backend call, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl ProviderConfig {
    /// Config carrying only an explicit credential.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("endpoint_url", &self.endpoint_url)
            .field("model_name", &self.model_name)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}
