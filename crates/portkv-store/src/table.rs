use std::collections::HashMap;

use crate::error::{StoreError, StoreResult};

/// Insertion-ordered string table with byte accounting.
///
/// Shared by the in-memory and file backends. `order` holds every key in
/// `values` exactly once.
#[derive(Clone, Debug, Default)]
pub(crate) struct EntryTable {
    values: HashMap<String, String>,
    order: Vec<String>,
    bytes: usize,
    quota: Option<usize>,
}

fn entry_bytes(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

impl EntryTable {
    pub(crate) fn with_quota(quota: Option<usize>) -> Self {
        Self {
            quota,
            ..Default::default()
        }
    }

    /// Build a table from ordered pairs. Later duplicates overwrite earlier ones
    /// in place. The quota is not checked on load.
    pub(crate) fn from_pairs(pairs: Vec<(String, String)>, quota: Option<usize>) -> Self {
        let mut table = Self::with_quota(None);
        for (key, value) in pairs {
            table.insert_unchecked(key, value);
        }
        table.quota = quota;
        table
    }

    pub(crate) fn get(&self, key: &str) -> Option<&String> {
        self.values.get(key)
    }

    pub(crate) fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if let Some(quota) = self.quota {
            let previous = self
                .values
                .get(key)
                .map(|old| entry_bytes(key, old))
                .unwrap_or(0);
            let needed = self.bytes - previous + entry_bytes(key, value);
            if needed > quota {
                tracing::warn!(key, needed, quota, "storage quota exceeded");
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }
        self.insert_unchecked(key.to_string(), value.to_string());
        Ok(())
    }

    fn insert_unchecked(&mut self, key: String, value: String) {
        self.bytes += entry_bytes(&key, &value);
        match self.values.get_mut(&key) {
            Some(existing) => {
                self.bytes -= entry_bytes(&key, existing);
                *existing = value;
            }
            None => {
                self.order.push(key.clone());
                self.values.insert(key, value);
            }
        }
    }

    /// Returns `true` if the key was present.
    pub(crate) fn remove(&mut self, key: &str) -> bool {
        match self.values.remove(key) {
            Some(old) => {
                self.bytes -= entry_bytes(key, &old);
                self.order.retain(|k| k != key);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
        self.order.clear();
        self.bytes = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn key_at(&self, index: usize) -> Option<&String> {
        self.order.get(index)
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.order.clone()
    }

    pub(crate) fn bytes(&self) -> usize {
        self.bytes
    }

    pub(crate) fn pairs(&self) -> Vec<(&str, &str)> {
        self.order
            .iter()
            .filter_map(|k| self.values.get(k).map(|v| (k.as_str(), v.as_str())))
            .collect()
    }
}
