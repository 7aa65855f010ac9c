//! HTTP host for the portkv storage bridge.
//!
//! Each inbound storage port is exposed as `POST /v1/ports/{port}` with the
//! port payload as the JSON body. The reply carries the paired response
//! message. The bridge itself is single-threaded, so requests are serialized
//! behind one lock.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{ServerConfig, DEFAULT_PORT};
pub use error::{ServerError, ServerResult};
pub use handler::{AppState, HealthResponse};
pub use server::PortkvServer;
