use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::file::FileStorage;
use crate::memory::InMemoryStorage;
use crate::traits::StorageBackend;

/// Selects and parameterizes a storage backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backing file for [`FileStorage`]. `None` selects [`InMemoryStorage`].
    pub path: Option<PathBuf>,
    /// Byte quota over all keys and values. `None` means unlimited.
    pub quota_bytes: Option<usize>,
}

impl StoreConfig {
    /// An in-memory store with no quota.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A file-backed store at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            quota_bytes: None,
        }
    }

    /// Open the configured backend.
    pub fn open(&self) -> StoreResult<Arc<dyn StorageBackend>> {
        Ok(match &self.path {
            Some(path) => Arc::new(FileStorage::open(path, self.quota_bytes)?),
            None => Arc::new(InMemoryStorage::with_quota(self.quota_bytes)),
        })
    }
}
