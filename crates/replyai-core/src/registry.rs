//! Provider registry. Maps provider ids to constructed adapters.
//!
//! Backends are built once, at startup, from the `[providers.<id>]`
//! sections of the config. A backend whose configuration does not validate
//! is logged and left out; the others are unaffected. Lookups for ids that
//! are not registered fall back to the local [`EchoProvider`].

use std::collections::HashMap;
use std::sync::Arc;

use replyai_config::AppConfig;
use tracing::{info, warn};

use crate::provider::{self, EchoProvider, NETWORK_PROVIDERS, SuggestionProvider};
use crate::secrets::{EnvLookup, process_env};

/// Registry of available suggestion providers.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn SuggestionProvider>>,
    fallback: Arc<dyn SuggestionProvider>,
}

impl ProviderRegistry {
    /// Create a registry holding only the echo provider.
    pub fn new() -> Self {
        let fallback: Arc<dyn SuggestionProvider> = Arc::new(EchoProvider::new());
        let mut providers = HashMap::new();
        providers.insert(fallback.id().to_string(), Arc::clone(&fallback));
        Self {
            providers,
            fallback,
        }
    }

    /// Build every network-backed provider from config, reading fallback
    /// credentials from the process environment.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::from_config_with_env(config, process_env)
    }

    /// Like [`from_config`](Self::from_config) with an explicit environment lookup.
    pub fn from_config_with_env(config: &AppConfig, env: EnvLookup) -> Self {
        let mut registry = Self::new();

        for id in NETWORK_PROVIDERS {
            let provider_config = config.provider(id);
            match provider::create_provider(id, &provider_config, env) {
                Some(Ok(provider)) => {
                    info!(provider = %id, "registered provider");
                    registry.register(Arc::from(provider));
                }
                Some(Err(e)) => {
                    warn!(provider = %id, error = %e, "skipping provider");
                }
                None => {}
            }
        }

        for id in config.providers.keys() {
            if !NETWORK_PROVIDERS.contains(&id.as_str()) && !registry.contains(id) {
                warn!(provider = %id, "config section for unknown provider ignored");
            }
        }

        registry
    }

    /// Register a provider under its own id, replacing any previous one.
    pub fn register(&mut self, provider: Arc<dyn SuggestionProvider>) {
        self.providers.insert(provider.id().to_string(), provider);
    }

    /// Look up a registered provider by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn SuggestionProvider>> {
        self.providers.get(id).cloned()
    }

    /// Look up a provider, falling back to echo for unregistered ids.
    pub fn resolve(&self, id: &str) -> Arc<dyn SuggestionProvider> {
        self.get(id).unwrap_or_else(|| {
            warn!(provider = %id, "unknown provider, using echo");
            Arc::clone(&self.fallback)
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    /// The provider unregistered ids resolve to.
    pub fn fallback(&self) -> Arc<dyn SuggestionProvider> {
        Arc::clone(&self.fallback)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
