use std::sync::Arc;

use odo_registry::Registry;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// Reading registry HTTP server.
pub struct OdoServer {
    config: ServerConfig,
    registry: Arc<Registry>,
}

impl OdoServer {
    pub fn new(config: ServerConfig, registry: Arc<Registry>) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.registry.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        if !self.registry.is_provisioned()? {
            tracing::warn!(
                index_key = %self.registry.config().index_key,
                "serving an unprovisioned ledger; run `odo init` first"
            );
        }
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "odo server listening");
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
