use std::sync::Arc;

use crate::error::StoreResult;

/// Synchronous string-keyed, string-valued storage.
///
/// This is the whole contract the bridge consumes from its host:
/// - `get_item` returns `Ok(None)` for a missing key, never an error.
/// - `set_item` creates or overwrites; an existing key keeps its position.
/// - `remove_item` and `clear` succeed whether or not anything was stored.
/// - `key(index)` walks the store in its native enumeration order for
///   `index < length()`.
///
/// Implementations are `Send + Sync` so a host can share one store across
/// threads. They do not make read-modify-write sequences atomic; callers that
/// need that must serialize access themselves.
pub trait StorageBackend: Send + Sync {
    /// Read the raw text stored under `key`.
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`.
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key` if present.
    fn remove_item(&self, key: &str) -> StoreResult<()>;

    /// Remove every key.
    fn clear(&self) -> StoreResult<()>;

    /// Number of stored keys.
    fn length(&self) -> StoreResult<usize>;

    /// The key at `index` in enumeration order, or `None` past the end.
    fn key(&self, index: usize) -> StoreResult<Option<String>>;

    /// All keys in enumeration order.
    ///
    /// Default implementation walks `key(0..length())`. Backends may override
    /// to take a single snapshot.
    fn keys(&self) -> StoreResult<Vec<String>> {
        let len = self.length()?;
        let mut keys = Vec::with_capacity(len);
        for index in 0..len {
            if let Some(key) = self.key(index)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }

    fn length(&self) -> StoreResult<usize> {
        (**self).length()
    }

    fn key(&self, index: usize) -> StoreResult<Option<String>> {
        (**self).key(index)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }
}
