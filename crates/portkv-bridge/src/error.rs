use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no handler registered for port {0}")]
    UnknownChannel(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] portkv_protocol::ProtocolError),

    /// Backend faults are not handled by the bridge; they surface here.
    #[error("store error: {0}")]
    Store(#[from] portkv_store::StoreError),
}

pub type BridgeResult<T> = Result<T, BridgeError>;
