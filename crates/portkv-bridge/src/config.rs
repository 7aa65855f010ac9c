use serde::{Deserialize, Serialize};

/// Bridge settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Report every command and response through `tracing` when no explicit
    /// port logger is supplied.
    pub log_ports: bool,
}

impl BridgeConfig {
    pub fn verbose() -> Self {
        Self { log_ports: true }
    }
}
