//! Host storage backends for the portkv storage bridge.
//!
//! The bridge never talks to a concrete store. It is handed something that
//! implements [`StorageBackend`], a synchronous string-keyed, string-valued
//! store modelled on the browser `Storage` interface: `get`, `set`, `remove`,
//! `clear`, `length` and `key(index)`.
//!
//! # Backends
//!
//! - [`InMemoryStorage`] -- process-local store for tests and embedding
//! - [`FileStorage`] -- durable store that rewrites a JSON file on every change
//!
//! Both keep keys in insertion order, enforce an optional byte quota, and
//! use a `RwLock` internally so they can be shared behind an `Arc`.
//!
//! # Design Rules
//!
//! 1. The store never interprets values -- they are opaque strings.
//! 2. Enumeration order is the store's own (insertion order here), not sorted.
//! 3. Quota and I/O failures are returned as errors, never swallowed.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
mod table;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use traits::StorageBackend;
