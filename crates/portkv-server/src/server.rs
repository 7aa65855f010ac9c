use portkv_bridge::{Bridge, Dispatcher};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// HTTP host for the storage ports.
pub struct PortkvServer {
    config: ServerConfig,
}

impl PortkvServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open the configured store and build the router (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        let store = self.config.store.open()?;
        let bridge = Bridge::from_config(store, &self.config.bridge);
        Ok(build_router(AppState::new(Dispatcher::register(bridge))))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router()?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("portkv server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portkv_store::StoreConfig;

    #[test]
    fn server_construction() {
        let server = PortkvServer::new(ServerConfig::default());
        assert_eq!(server.config().bind_addr.port(), 9420);
    }

    #[test]
    fn router_builds() {
        let server = PortkvServer::new(ServerConfig::default());
        assert!(server.router().is_ok());
    }

    #[test]
    fn router_reports_corrupt_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "garbage").unwrap();
        let config = ServerConfig {
            store: StoreConfig::file(&path),
            ..Default::default()
        };
        let err = PortkvServer::new(config).router().unwrap_err();
        assert!(matches!(err, ServerError::Store(_)));
    }
}
