use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::table::EntryTable;
use crate::traits::StorageBackend;

/// Durable storage backend backed by a single JSON file.
///
/// The file holds an array of `[key, value]` string pairs in enumeration
/// order:
///
/// ```text
/// [["theme","\"dark\""],["tags","[\"x\"]"]]
/// ```
///
/// The whole table is loaded on [`open`](Self::open) and every mutation
/// rewrites the file through a temporary sibling that is renamed into place,
/// so a crash never leaves a half-written store behind.
pub struct FileStorage {
    path: PathBuf,
    table: RwLock<EntryTable>,
}

impl FileStorage {
    /// Open the store at `path`, creating an empty one if the file is missing.
    pub fn open(path: impl AsRef<Path>, quota: Option<usize>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let pairs = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => serde_json::from_str::<Vec<(String, String)>>(&text).map_err(|e| {
                StoreError::Corrupt {
                    path: path.clone(),
                    reason: e.to_string(),
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), entries = pairs.len(), "opened file storage");
        Ok(Self {
            path,
            table: RwLock::new(EntryTable::from_pairs(pairs, quota)),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, table: &EntryTable) -> StoreResult<()> {
        let text = serde_json::to_string(&table.pairs())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), entries = table.len(), "flushed file storage");
        Ok(())
    }

    fn mutate<T>(&self, op: impl FnOnce(&mut EntryTable) -> StoreResult<T>) -> StoreResult<T> {
        let mut table = self.table.write().expect("lock poisoned");
        let mut next = table.clone();
        let out = op(&mut next)?;
        self.flush(&next)?;
        *table = next;
        Ok(out)
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let table = self.table.read().expect("lock poisoned");
        Ok(table.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.mutate(|table| table.set(key, value))
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.mutate(|table| {
            table.remove(key);
            Ok(())
        })
    }

    fn clear(&self) -> StoreResult<()> {
        self.mutate(|table| {
            table.clear();
            Ok(())
        })
    }

    fn length(&self) -> StoreResult<usize> {
        Ok(self.table.read().expect("lock poisoned").len())
    }

    fn key(&self, index: usize) -> StoreResult<Option<String>> {
        let table = self.table.read().expect("lock poisoned");
        Ok(table.key_at(index).cloned())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.table.read().expect("lock poisoned").keys())
    }
}

impl std::fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .finish()
    }
}
