//! Storage bridge for sandboxed applications.
//!
//! An application that cannot reach host storage directly sends commands on
//! named ports (`storageGetItem`, `storagePushToSet`, ...). The bridge runs
//! each command against a [`StorageBackend`](portkv_store::StorageBackend)
//! and answers on the paired `...Response` port.
//!
//! # Pieces
//!
//! - [`Bridge`] -- executes typed commands; values are stored as JSON text
//! - [`Dispatcher`] -- registration map from port name to handler
//! - [`PortLogger`] -- optional callback that sees every command and response
//! - [`sets`] -- the set-as-list algorithms behind push/remove-from-set
//!
//! # Guarantees
//!
//! 1. Every handled command gets exactly one response, except
//!    remove-from-set on a value that is not a list, which gets none.
//! 2. Stored text that is not JSON reads back as `null`, never an error.
//! 3. Backend failures are not retried or masked; they surface as
//!    [`BridgeError::Store`] and no response is sent.

pub mod bridge;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logger;
pub mod sets;

pub use bridge::{Bridge, SetRemoval, REMOVE_FROM_SET_ABORT_EVENT};
pub use config::BridgeConfig;
pub use dispatcher::{Dispatcher, ResponsePort};
pub use error::{BridgeError, BridgeResult};
pub use logger::{LogEvent, NoopLogger, PortLogger, RecordingLogger, TracingLogger};
