//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating boilerplate across crate boundaries.

use replyai_config::{AppConfig, ProviderConfig};

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .provider("openrouter", mock_provider_config(&mock.uri()))
///     .default_provider("openrouter")
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn default_provider(mut self, id: &str) -> Self {
        self.config.suggest.default_provider = id.to_string();
        self
    }

    /// Add or replace a `[providers.<id>]` section.
    pub fn provider(mut self, id: &str, provider: ProviderConfig) -> Self {
        self.config.providers.insert(id.to_string(), provider);
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A config file written into a temporary directory.
///
/// The directory is deleted when this value is dropped.
pub struct TempConfigFile {
    pub path: std::path::PathBuf,
    _dir: tempfile::TempDir,
}

impl TempConfigFile {
    /// Write `toml_content` to `replyai.toml` in a fresh temp directory.
    pub async fn with_toml(toml_content: &str) -> Self {
        let dir = tempfile::TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("replyai.toml");
        tokio::fs::write(&path, toml_content)
            .await
            .expect("failed to write test config");
        Self { path, _dir: dir }
    }
}
