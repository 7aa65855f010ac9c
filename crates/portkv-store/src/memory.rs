use std::sync::RwLock;

use crate::error::StoreResult;
use crate::table::EntryTable;
use crate::traits::StorageBackend;

/// In-memory storage backend.
///
/// Intended for tests and embedding. Entries are held behind a `RwLock` and
/// enumerate in insertion order. An optional byte quota (sum of key and value
/// lengths) makes writes fail the way a full browser store does.
pub struct InMemoryStorage {
    table: RwLock<EntryTable>,
}

impl InMemoryStorage {
    /// Create a new empty store without a quota.
    pub fn new() -> Self {
        Self::with_quota(None)
    }

    /// Create a new empty store limited to `quota` bytes, if given.
    pub fn with_quota(quota: Option<usize>) -> Self {
        Self {
            table: RwLock::new(EntryTable::with_quota(quota)),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.table.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes across all stored keys and values.
    pub fn total_bytes(&self) -> usize {
        self.table.read().expect("lock poisoned").bytes()
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for InMemoryStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let table = self.table.read().expect("lock poisoned");
        Ok(table.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.table.write().expect("lock poisoned").set(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.table.write().expect("lock poisoned").remove(key);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.table.write().expect("lock poisoned").clear();
        Ok(())
    }

    fn length(&self) -> StoreResult<usize> {
        Ok(self.len())
    }

    fn key(&self, index: usize) -> StoreResult<Option<String>> {
        let table = self.table.read().expect("lock poisoned");
        Ok(table.key_at(index).cloned())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.table.read().expect("lock poisoned").keys())
    }
}

impl std::fmt::Debug for InMemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStorage")
            .field("key_count", &self.len())
            .finish()
    }
}
