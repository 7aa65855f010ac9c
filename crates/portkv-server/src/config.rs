use std::net::SocketAddr;
use std::path::Path;

use portkv_bridge::BridgeConfig;
use portkv_store::StoreConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

pub const DEFAULT_PORT: u16 = 9420;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub bridge: BridgeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            store: StoreConfig::default(),
            bridge: BridgeConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file. Missing fields take their defaults.
    ///
    /// ```toml
    /// bind_addr = "0.0.0.0:9420"
    ///
    /// [store]
    /// path = "/var/lib/portkv/store.json"
    /// quota_bytes = 5242880
    ///
    /// [bridge]
    /// log_ports = true
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }
}
