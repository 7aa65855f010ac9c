//! Port protocol for the portkv storage bridge.
//!
//! An application talks to host storage only through named ports. Each
//! inbound command port (`storageGetItem`, `storageSetItem`, ...) is paired
//! with an outbound response port of the same name suffixed by `Response`.
//! This crate defines those names, the typed command and response records
//! carried over them, and the line framing used when the ports run over a
//! byte stream.

pub mod channel;
pub mod codec;
pub mod error;
pub mod message;

pub use channel::{has_storage_ports, Channel, SAMPLE_PORT_NAME};
pub use codec::{LineCodec, MAX_MESSAGE_SIZE};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{Command, Entry, PortMessage, Response};
