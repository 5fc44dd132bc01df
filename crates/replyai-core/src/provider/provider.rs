//! Provider trait: the contract every suggestion backend satisfies.
//!
//! The HTTP layer and the registry dispatch through this interface only;
//! nothing outside an adapter knows which backend it is talking to.

use std::ops::RangeInclusive;
use std::time::Duration;

use replyai_config::ProviderConfig;
use tracing::warn;

use crate::BoxFuture;
use crate::secrets::{EnvLookup, SecretValue, resolve_credential};

use super::error::ProviderError;
use super::types::{SuggestRequest, SuggestResponse};

/// Static identity of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Registry key and error tag (e.g. `"gemini"`).
    pub id: &'static str,
    /// Display name (e.g. `"Google Gemini"`).
    pub name: &'static str,
    /// Short label used in error messages (e.g. `"Gemini"`).
    pub label: &'static str,
    /// Environment variable holding the fallback credential.
    pub env_var: &'static str,
}

/// Core trait for suggestion providers.
///
/// Implementations must be `Send + Sync`; a single instance serves all
/// concurrent requests. Uses `BoxFuture` for object safety.
pub trait SuggestionProvider: Send + Sync {
    /// Registry id (e.g. `"openrouter"`).
    fn id(&self) -> &str;

    /// Provider display name (e.g. "OpenRouter AI").
    fn name(&self) -> &str;

    /// Check credential presence and parameter ranges.
    fn validate_config(&self) -> Result<(), ProviderError>;

    /// Generate exactly three reply suggestions.
    fn generate(&self, request: &SuggestRequest)
    -> BoxFuture<'_, Result<SuggestResponse, ProviderError>>;

    /// Rough cost of serving the request, in USD. Never negative.
    fn estimate_cost(&self, request: &SuggestRequest) -> f64;

    /// Whether the provider is usable right now.
    fn is_available(&self) -> bool {
        match self.validate_config() {
            Ok(()) => true,
            Err(e) => {
                warn!(provider = %self.id(), error = %e, "provider unavailable");
                false
            }
        }
    }
}

/// Per-adapter defaults applied to absent [`ProviderConfig`] fields.
#[derive(Debug, Clone)]
pub struct ProviderDefaults {
    pub endpoint_url: &'static str,
    pub model_name: &'static str,
    pub timeout_secs: u64,
    pub max_tokens_range: RangeInclusive<u32>,
}

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// A [`ProviderConfig`] with every default filled in.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Explicit credential, if any. The env fallback is looked up on demand.
    pub api_key: Option<SecretValue>,
    pub endpoint_url: String,
    pub model_name: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout: Duration,
    max_tokens_range: RangeInclusive<u32>,
}

impl ResolvedConfig {
    pub fn resolve(config: &ProviderConfig, defaults: &ProviderDefaults) -> Self {
        Self {
            api_key: config.api_key.as_deref().map(SecretValue::new),
            endpoint_url: config
                .endpoint_url
                .clone()
                .unwrap_or_else(|| defaults.endpoint_url.to_string())
                .trim_end_matches('/')
                .to_string(),
            model_name: config
                .model_name
                .clone()
                .unwrap_or_else(|| defaults.model_name.to_string()),
            temperature: config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout: Duration::from_secs(config.timeout_seconds.unwrap_or(defaults.timeout_secs)),
            max_tokens_range: defaults.max_tokens_range.clone(),
        }
    }

    /// The credential to use: explicit first, then the environment.
    pub fn credential(&self, info: &ProviderInfo, env: EnvLookup) -> Option<SecretValue> {
        resolve_credential(
            self.api_key.as_ref().map(SecretValue::expose),
            info.env_var,
            env,
        )
    }

    /// Validation shared by every network-backed adapter.
    pub fn validate(&self, info: &ProviderInfo, env: EnvLookup) -> Result<(), ProviderError> {
        if self.credential(info, env).is_none() {
            return Err(ProviderError::config(
                info.id,
                format!("{} must be provided via config or environment", info.env_var),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ProviderError::config(
                info.id,
                "Temperature must be between 0 and 2",
            ));
        }
        if !self.max_tokens_range.contains(&self.max_tokens) {
            return Err(ProviderError::config(
                info.id,
                format!(
                    "Max tokens must be between {} and {}",
                    self.max_tokens_range.start(),
                    self.max_tokens_range.end()
                ),
            ));
        }
        Ok(())
    }

    /// Metadata keys every adapter reports.
    pub fn base_metadata(&self, info: &ProviderInfo) -> super::types::Metadata {
        let mut metadata = super::types::Metadata::new();
        metadata.insert("provider".into(), info.id.into());
        metadata.insert("model".into(), self.model_name.clone().into());
        metadata.insert("temperature".into(), self.temperature.into());
        metadata.insert("max_tokens".into(), self.max_tokens.into());
        metadata
    }
}
