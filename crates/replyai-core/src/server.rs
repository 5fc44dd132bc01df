//! Server process: startup, shutdown, and the main serve loop.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use replyai_config::AppConfig;

use crate::api::{self, ApiState};
use crate::personalization::{InMemoryPersonalizationStore, PersonalizationStore};
use crate::registry::ProviderRegistry;

/// The suggestion server.
pub struct Server {
    config: AppConfig,
    registry: Arc<ProviderRegistry>,
    store: Arc<dyn PersonalizationStore>,
    /// Latches to `true` once shutdown is requested.
    shutdown_tx: watch::Sender<bool>,
}

impl Server {
    /// Create a server, building every configured provider.
    pub fn new(config: AppConfig) -> Self {
        let registry = ProviderRegistry::from_config(&config);
        Self::with_registry(config, registry)
    }

    /// Create a server around an already-built registry.
    pub fn with_registry(config: AppConfig, registry: ProviderRegistry) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            config,
            registry: Arc::new(registry),
            store: Arc::new(InMemoryPersonalizationStore::new()),
            shutdown_tx,
        }
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(&self) -> Result<(), ServerError> {
        let addr = format!(
            "{}:{}",
            self.config.server.listen_addr, self.config.server.listen_port
        );
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind { addr, source: e })?;
        self.run_on(listener).await
    }

    /// Serve on an already-bound listener until Ctrl-C or [`shutdown`](Self::shutdown).
    pub async fn run_on(&self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        info!(
            addr = %local_addr,
            version = %crate::build_info::version_string(),
            providers = ?self.registry.ids(),
            default_provider = %self.config.suggest.default_provider,
            "reply suggester starting"
        );

        let state = Arc::new(ApiState {
            config: self.config.clone(),
            registry: Arc::clone(&self.registry),
            store: Arc::clone(&self.store),
        });
        let server = api::serve(listener, state, self.shutdown_tx.subscribe());
        tokio::pin!(server);

        tokio::select! {
            result = &mut server => {
                result?;
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Ctrl-C received, initiating graceful shutdown");
                self.shutdown();
                server.await?;
            }
        }

        info!("Server stopped");
        Ok(())
    }

    /// Request a graceful shutdown of the server.
    pub fn shutdown(&self) {
        // send_replace stores the value even with no receivers yet.
        self.shutdown_tx.send_replace(true);
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }
}

/// Errors from the server runtime.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
