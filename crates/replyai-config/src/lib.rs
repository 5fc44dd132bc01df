#![deny(unsafe_code)]

//! Configuration loading and validation for the reply suggestion service.
//!
//! Loads TOML configuration files into [`AppConfig`], the central
//! configuration structure, and layers the deployment environment
//! variables on top. Per-backend settings live in [`provider`].

/// Per-backend provider settings.
pub mod provider;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use provider::ProviderConfig;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Log levels accepted by `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Cross-origin policy for browser clients.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Suggestion routing defaults.
    #[serde(default)]
    pub suggest: SuggestConfig,

    /// Backend settings keyed by provider id (`gemini`, `openrouter`, `qwen`).
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

/// Configuration for the HTTP listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the server binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Port the server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            listen_port: default_listen_port(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_listen_port() -> u16 {
    8000
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Cross-origin resource sharing configuration.
///
/// An origin of `"*"` allows any origin; credentials are then never
/// advertised, whatever `allow_credentials` says.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins.
    #[serde(default = "default_cors_origins")]
    pub origins: Vec<String>,

    /// Whether browsers may send cookies and auth headers.
    #[serde(default = "default_cors_allow_credentials")]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_cors_origins(),
            allow_credentials: default_cors_allow_credentials(),
        }
    }
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8000".to_string(),
        "http://127.0.0.1:8000".to_string(),
        "http://localhost:8080".to_string(),
    ]
}

fn default_cors_allow_credentials() -> bool {
    true
}

/// Suggestion routing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Provider used when a request does not name one. Unknown ids fall
    /// back to the local echo provider.
    #[serde(default = "default_provider")]
    pub default_provider: String,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
        }
    }
}

fn default_provider() -> String {
    "echo".to_string()
}

/// Accepts the usual spellings of a boolean environment flag.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading configuration");
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay deployment environment variables onto the loaded config.
    ///
    /// Recognized: `API_HOST`, `API_PORT`, `LOG_LEVEL`, `CORS_ORIGINS`
    /// (comma-separated), `CORS_ALLOW_CREDENTIALS` and `DEFAULT_PROVIDER`. The lookup is injected so
    /// callers can pass `|k| std::env::var(k).ok()` or a fixed map.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("API_HOST") {
            self.server.listen_addr = host;
        }
        if let Some(port) = lookup("API_PORT") {
            self.server.listen_port = port.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("API_PORT must be a port number, got {port:?}"))
            })?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level.trim().to_ascii_lowercase();
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.cors.origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(flag) = lookup("CORS_ALLOW_CREDENTIALS") {
            self.cors.allow_credentials = parse_flag(&flag).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "CORS_ALLOW_CREDENTIALS must be true or false, got {flag:?}"
                ))
            })?;
        }
        if let Some(provider) = lookup("DEFAULT_PROVIDER") {
            self.suggest.default_provider = provider;
        }
        debug!(
            addr = %self.server.listen_addr,
            port = self.server.listen_port,
            default_provider = %self.suggest.default_provider,
            "environment overrides applied"
        );
        self.validate()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen_port == 0 {
            return Err(ConfigError::Validation(
                "server.listen_port must be non-zero".to_string(),
            ));
        }
        if self.server.listen_addr.is_empty() {
            return Err(ConfigError::Validation(
                "server.listen_addr must not be empty".to_string(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                LOG_LEVELS, self.logging.level
            )));
        }
        if self.suggest.default_provider.trim().is_empty() {
            return Err(ConfigError::Validation(
                "suggest.default_provider must not be empty".to_string(),
            ));
        }
        for (i, origin) in self.cors.origins.iter().enumerate() {
            if origin.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "cors.origins[{i}] must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Settings for one provider, or an empty table when none was given.
    pub fn provider(&self, id: &str) -> ProviderConfig {
        self.providers.get(id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.listen_addr, "0.0.0.0");
        assert_eq!(config.server.listen_port, 8000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.suggest.default_provider, "echo");
        assert_eq!(config.cors.origins.len(), 3);
        assert!(config.cors.allow_credentials);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.server.listen_port, 8000);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            [server]
            listen_addr = "127.0.0.1"
            listen_port = 9000

            [logging]
            level = "debug"

            [cors]
            origins = ["*"]
            allow_credentials = false

            [suggest]
            default_provider = "openrouter"

            [providers.gemini]
            model_name = "gemini-1.5-pro"
            max_tokens = 4096

            [providers.openrouter]
            api_key = "sk-or-test"
            temperature = 1.2
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.server.listen_addr, "127.0.0.1");
        assert_eq!(config.server.listen_port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.cors.origins, vec!["*".to_string()]);
        assert!(!config.cors.allow_credentials);
        assert_eq!(config.suggest.default_provider, "openrouter");
        assert_eq!(
            config.provider("gemini").model_name.as_deref(),
            Some("gemini-1.5-pro")
        );
        assert_eq!(config.provider("gemini").max_tokens, Some(4096));
        assert_eq!(
            config.provider("openrouter").api_key.as_deref(),
            Some("sk-or-test")
        );
    }

    #[test]
    fn test_missing_provider_section_is_empty() {
        let config = AppConfig::default();
        assert_eq!(config.provider("qwen"), ProviderConfig::default());
    }

    #[test]
    fn test_validation_rejects_zero_port() {
        let toml = r#"
            [server]
            listen_port = 0
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_empty_addr() {
        let toml = r#"
            [server]
            listen_addr = ""
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_log_level() {
        let toml = r#"
            [logging]
            level = "loud"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_blank_default_provider() {
        let toml = r#"
            [suggest]
            default_provider = "  "
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(env(&[
                ("API_HOST", "127.0.0.1"),
                ("API_PORT", "8088"),
                ("LOG_LEVEL", "DEBUG"),
                ("CORS_ORIGINS", "http://a.test, http://b.test,"),
                ("CORS_ALLOW_CREDENTIALS", "False"),
                ("DEFAULT_PROVIDER", "gemini"),
            ]))
            .unwrap();
        assert_eq!(config.server.listen_addr, "127.0.0.1");
        assert_eq!(config.server.listen_port, 8088);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.cors.origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(!config.cors.allow_credentials);
        assert_eq!(config.suggest.default_provider, "gemini");
    }

    #[test]
    fn test_env_override_rejects_bad_credentials_flag() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_overrides(env(&[("CORS_ALLOW_CREDENTIALS", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("CORS_ALLOW_CREDENTIALS"));
        assert!(config.cors.allow_credentials);
    }

    #[test]
    fn test_env_overrides_absent_keep_file_values() {
        let mut config = AppConfig::parse("[server]\nlisten_port = 7000\n").unwrap();
        config.apply_env_overrides(env(&[])).unwrap();
        assert_eq!(config.server.listen_port, 7000);
    }

    #[test]
    fn test_env_override_rejects_bad_port() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_overrides(env(&[("API_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("API_PORT"));
    }

    #[test]
    fn test_show_omits_api_keys() {
        let config = AppConfig::parse(
            r#"
            [providers.qwen]
            api_key = "sk-dashscope"
            model_name = "qwen-plus"
        "#,
        )
        .unwrap();
        let out = toml::to_string_pretty(&config).unwrap();
        assert!(!out.contains("sk-dashscope"));
        assert!(out.contains("qwen-plus"));
    }

    // ── Async file-based loading ──────────────────────────────────────

    #[test_log::test(tokio::test)]
    async fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("replyai.toml");
        tokio::fs::write(
            &path,
            b"[server]\nlisten_port = 4242\nlisten_addr = \"127.0.0.1\"\n",
        )
        .await
        .unwrap();

        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.server.listen_port, 4242);
        assert_eq!(config.server.listen_addr, "127.0.0.1");
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = AppConfig::load(Path::new("/nonexistent/file.toml")).await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_invalid_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        tokio::fs::write(&path, b"not valid toml [[[").await.unwrap();

        let result = AppConfig::load(&path).await;
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("bad value".to_string());
        assert_eq!(err.to_string(), "validation error: bad value");
    }
}
