//! Provider error taxonomy and failure classification.
//!
//! Backends fail in very different ways, so adapters never hand raw
//! transport errors to callers. Every failure is first reduced to a
//! [`RawFailure`] (a message plus an optional retry-after hint) and then
//! classified by [`classify_failure`] into a [`ProviderError`].

use super::provider::ProviderInfo;

/// Errors surfaced by providers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// Invalid configuration. Only produced while constructing an adapter.
    #[error("invalid configuration for provider {provider}: {message}")]
    Config { provider: String, message: String },

    /// The backend rejected the credential.
    #[error("{message}")]
    Auth { provider: String, message: String },

    /// Quota or rate limit hit, with the backend's retry-after hint.
    #[error("{message}")]
    RateLimited {
        provider: String,
        message: String,
        retry_after_secs: Option<u64>,
    },

    /// Any other generation failure.
    #[error("{message}")]
    Generation {
        provider: String,
        message: String,
        retryable: bool,
    },
}

impl ProviderError {
    pub fn config(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Authentication failure with the standard message.
    pub fn auth(provider: impl Into<String>) -> Self {
        let provider = provider.into();
        Self::Auth {
            message: format!("Authentication failed for provider {provider}"),
            provider,
        }
    }

    /// Id of the provider that produced this error.
    pub fn provider(&self) -> &str {
        match self {
            Self::Config { provider, .. }
            | Self::Auth { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::Generation { provider, .. } => provider,
        }
    }

    /// Human-readable message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Config { message, .. }
            | Self::Auth { message, .. }
            | Self::RateLimited { message, .. }
            | Self::Generation { message, .. } => message,
        }
    }

    /// Whether the caller may reasonably retry the same request.
    pub fn retryable(&self) -> bool {
        match self {
            Self::Config { .. } | Self::Auth { .. } => false,
            Self::RateLimited { .. } => true,
            Self::Generation { retryable, .. } => *retryable,
        }
    }

    /// Retry-after hint in seconds, when the backend supplied one.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }
}

/// An unclassified failure from a backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFailure {
    pub message: String,
    pub retry_after_secs: Option<u64>,
}

impl RawFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retry_after_secs: None,
        }
    }

    pub fn with_retry_after(mut self, secs: Option<u64>) -> Self {
        self.retry_after_secs = secs;
        self
    }
}

impl From<reqwest::Error> for RawFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::new("request timed out");
        }
        // The URL is dropped so path segments such as `:generateContent`
        // cannot trip the keyword matching below.
        let err = err.without_url();
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(message)
    }
}

const QUOTA_KEYWORDS: [&str; 4] = ["quota", "rate", "limit", "insufficient"];

/// Classify a raw failure by keyword matching on its lower-cased message.
///
/// First match wins:
///
/// 1. `api` together with `key`, or `auth`, or `unauthorized` → [`ProviderError::Auth`]
/// 2. `quota`, `rate`, `limit` or `insufficient` → retryable, "quota exceeded"
///    ([`ProviderError::RateLimited`] when a retry-after hint is present)
/// 3. anything else → retryable [`ProviderError::Generation`]
///
/// Status codes are deliberately not consulted; only the text is.
pub fn classify_failure(info: &ProviderInfo, failure: RawFailure) -> ProviderError {
    let lower = failure.message.to_lowercase();

    let is_auth = (lower.contains("api") && lower.contains("key"))
        || lower.contains("auth")
        || lower.contains("unauthorized");
    if is_auth {
        return ProviderError::auth(info.id);
    }

    if QUOTA_KEYWORDS.iter().any(|k| lower.contains(k)) {
        let message = format!("{} quota exceeded: {}", info.label, failure.message);
        return match failure.retry_after_secs {
            Some(secs) => ProviderError::RateLimited {
                provider: info.id.to_string(),
                message,
                retry_after_secs: Some(secs),
            },
            None => ProviderError::Generation {
                provider: info.id.to_string(),
                message,
                retryable: true,
            },
        };
    }

    ProviderError::Generation {
        provider: info.id.to_string(),
        message: format!("{} generation failed: {}", info.label, failure.message),
        retryable: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INFO: ProviderInfo = ProviderInfo {
        id: "openrouter",
        name: "OpenRouter AI",
        label: "OpenRouter",
        env_var: "OPENROUTER_API_KEY",
    };

    #[test]
    fn test_invalid_api_key_is_auth() {
        let err = classify_failure(&INFO, RawFailure::new("Invalid API key"));
        assert_eq!(err, ProviderError::auth("openrouter"));
        assert!(!err.retryable());
        assert_eq!(err.to_string(), "Authentication failed for provider openrouter");
    }

    #[test]
    fn test_unauthorized_status_is_auth() {
        let err = classify_failure(&INFO, RawFailure::new("401 Unauthorized: {}"));
        assert!(matches!(err, ProviderError::Auth { .. }));
    }

    #[test]
    fn test_rate_limit_is_retryable_quota() {
        let err = classify_failure(&INFO, RawFailure::new("Rate limit exceeded"));
        assert!(err.retryable());
        assert!(err.message().contains("quota exceeded"));
        assert_eq!(
            err.message(),
            "OpenRouter quota exceeded: Rate limit exceeded"
        );
        assert!(matches!(err, ProviderError::Generation { .. }));
    }

    #[test]
    fn test_retry_after_hint_yields_rate_limited() {
        let failure = RawFailure::new("429 Too Many Requests: rate limited").with_retry_after(Some(30));
        let err = classify_failure(&INFO, failure);
        assert_eq!(err.retry_after_secs(), Some(30));
        assert!(matches!(err, ProviderError::RateLimited { .. }));
        assert!(err.retryable());
    }

    #[test]
    fn test_auth_checked_before_quota() {
        let err = classify_failure(&INFO, RawFailure::new("api key quota limit"));
        assert!(matches!(err, ProviderError::Auth { .. }));
    }

    #[test]
    fn test_insufficient_credits_is_quota() {
        let err = classify_failure(&INFO, RawFailure::new("Insufficient credits"));
        assert!(err.message().starts_with("OpenRouter quota exceeded"));
    }

    #[test]
    fn test_other_failures_are_retryable_generation() {
        let err = classify_failure(&INFO, RawFailure::new("connection reset by peer"));
        assert_eq!(
            err,
            ProviderError::Generation {
                provider: "openrouter".to_string(),
                message: "OpenRouter generation failed: connection reset by peer".to_string(),
                retryable: true,
            }
        );
        assert_eq!(err.provider(), "openrouter");
    }

    #[test]
    fn test_timeout_is_retryable() {
        let err = classify_failure(&INFO, RawFailure::new("request timed out"));
        assert!(err.retryable());
        assert!(err.message().contains("generation failed"));
    }

    #[test]
    fn test_config_error_not_retryable() {
        let err = ProviderError::config("gemini", "Temperature must be between 0 and 2");
        assert!(!err.retryable());
        assert_eq!(err.provider(), "gemini");
        assert_eq!(
            err.to_string(),
            "invalid configuration for provider gemini: Temperature must be between 0 and 2"
        );
    }
}
