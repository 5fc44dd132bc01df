//! Server test helpers.
//!
//! [`TestServer`] runs a [`Server`] on an ephemeral loopback port for the
//! duration of a test and shuts it down when dropped.

use std::net::SocketAddr;
use std::sync::Arc;

use replyai_config::AppConfig;
use replyai_core::{ProviderRegistry, Server};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A running server bound to `127.0.0.1:<ephemeral>`.
pub struct TestServer {
    pub server: Arc<Server>,
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server around the given config and registry.
    pub async fn start(config: AppConfig, registry: ProviderRegistry) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no address");

        let server = Arc::new(Server::with_registry(config, registry));
        let running = Arc::clone(&server);
        let handle = tokio::spawn(async move {
            running
                .run_on(listener)
                .await
                .expect("test server failed");
        });

        Self {
            server,
            addr,
            handle,
        }
    }

    /// Start a server with default config and only the echo provider.
    pub async fn echo_only() -> Self {
        Self::start(AppConfig::default(), ProviderRegistry::new()).await
    }

    /// Absolute URL for a path on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.shutdown();
        self.handle.abort();
    }
}
