use portkv_protocol::{Command, Entry, Response};
use portkv_store::{StorageBackend, StoreResult};
use serde_json::Value;
use tracing::debug;

use crate::config::BridgeConfig;
use crate::error::BridgeResult;
use crate::logger::{NoopLogger, PortLogger, TracingLogger};
use crate::sets::{push_unique, remove_by_json_text};

/// Logged instead of a response when remove-from-set finds no list.
pub const REMOVE_FROM_SET_ABORT_EVENT: &str = "storageRemoveFromSet [aborting; not a list]";

/// Result of [`Bridge::remove_from_set`].
#[derive(Clone, Debug, PartialEq)]
pub enum SetRemoval {
    /// The filtered list was written back.
    Updated,
    /// The stored value was not a list; nothing was written.
    NotAList(Value),
}

/// Executes storage commands against a host backend.
///
/// The bridge keeps no state of its own: every operation reads from or
/// writes to the backend directly. Values cross the backend boundary as JSON
/// text. Stored text that does not parse reads back as `null`.
///
/// Read-modify-write operations (`push_to_set`, `remove_from_set`) are not
/// atomic. Callers that share one bridge across threads must serialize
/// access to it.
pub struct Bridge<S> {
    store: S,
    logger: Box<dyn PortLogger>,
}

impl<S: StorageBackend> Bridge<S> {
    /// A bridge that logs nothing.
    pub fn new(store: S) -> Self {
        Self::with_logger(store, NoopLogger)
    }

    pub fn with_logger(store: S, logger: impl PortLogger + 'static) -> Self {
        Self {
            store,
            logger: Box::new(logger),
        }
    }

    pub fn from_config(store: S, config: &BridgeConfig) -> Self {
        if config.log_ports {
            Self::with_logger(store, TracingLogger)
        } else {
            Self::new(store)
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one command and produce its response.
    ///
    /// Returns `Ok(None)` only for remove-from-set on a non-list value.
    /// Backend failures propagate as errors and produce no response.
    pub fn execute(&self, command: Command) -> BridgeResult<Option<Response>> {
        self.logger.log(command.channel().name(), &command.log_args());

        let response = match command {
            Command::GetItem { key } => {
                let value = self.get_item(&key)?;
                Response::GetItem { key, value }
            }
            Command::GetItems { keys } => Response::GetItems(self.get_items(&keys)?),
            Command::SetItem(entry) => {
                self.set_item(&entry)?;
                Response::SetItem
            }
            Command::SetItems(entries) => {
                self.set_items(&entries)?;
                Response::SetItems
            }
            Command::RemoveItem { key } => {
                self.remove_item(&key)?;
                Response::RemoveItem
            }
            Command::Clear => {
                self.clear()?;
                Response::Clear
            }
            Command::PushToSet(entry) => {
                self.push_to_set(&entry)?;
                Response::PushToSet
            }
            Command::RemoveFromSet(entry) => match self.remove_from_set(&entry)? {
                SetRemoval::Updated => Response::RemoveFromSet,
                SetRemoval::NotAList(stored) => {
                    debug!(key = %entry.key, "remove-from-set target is not a list, not responding");
                    self.logger.log(
                        REMOVE_FROM_SET_ABORT_EVENT,
                        &[Value::String(entry.key), entry.value, stored],
                    );
                    return Ok(None);
                }
            },
            Command::EnumKeys => Response::EnumKeys(self.enum_keys()?),
        };

        self.logger.log(response.port_name(), &response_log_args(&response));
        Ok(Some(response))
    }

    /// The decoded value at `key`, or `null` if absent or undecodable.
    pub fn get_item(&self, key: &str) -> BridgeResult<Value> {
        Ok(read_value(&self.store, key)?)
    }

    /// Entries for `keys` in request order, omitting keys whose value is `null`.
    pub fn get_items(&self, keys: &[String]) -> BridgeResult<Vec<Entry>> {
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let value = read_value(&self.store, key)?;
            if !value.is_null() {
                entries.push(Entry::new(key.clone(), value));
            }
        }
        Ok(entries)
    }

    pub fn set_item(&self, entry: &Entry) -> BridgeResult<()> {
        Ok(write_value(&self.store, &entry.key, &entry.value)?)
    }

    /// Write entries in order. The first failure aborts the rest; entries
    /// already written stay written.
    pub fn set_items(&self, entries: &[Entry]) -> BridgeResult<()> {
        for entry in entries {
            self.set_item(entry)?;
        }
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> BridgeResult<()> {
        Ok(self.store.remove_item(key)?)
    }

    pub fn clear(&self) -> BridgeResult<()> {
        Ok(self.store.clear()?)
    }

    /// Add `entry.value` to the list at `entry.key` unless already present.
    pub fn push_to_set(&self, entry: &Entry) -> BridgeResult<()> {
        let current = read_value(&self.store, &entry.key)?;
        let list = push_unique(current, entry.value.clone());
        Ok(write_value(&self.store, &entry.key, &Value::Array(list))?)
    }

    /// Remove every element of the list at `entry.key` whose JSON text
    /// matches `entry.value`.
    pub fn remove_from_set(&self, entry: &Entry) -> BridgeResult<SetRemoval> {
        let list = match read_value(&self.store, &entry.key)? {
            Value::Array(items) => items,
            other => return Ok(SetRemoval::NotAList(other)),
        };
        let updated = remove_by_json_text(list, &entry.value);
        write_value(&self.store, &entry.key, &Value::Array(updated))?;
        Ok(SetRemoval::Updated)
    }

    /// All keys in the backend's enumeration order.
    pub fn enum_keys(&self) -> BridgeResult<Vec<String>> {
        Ok(self.store.keys()?)
    }
}

impl<S> std::fmt::Debug for Bridge<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge").finish_non_exhaustive()
    }
}

fn read_value<S: StorageBackend + ?Sized>(store: &S, key: &str) -> StoreResult<Value> {
    let Some(text) = store.get_item(key)? else {
        return Ok(Value::Null);
    };
    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(e) => {
            debug!(key, error = %e, "stored text is not JSON, reading as null");
            Ok(Value::Null)
        }
    }
}

fn write_value<S: StorageBackend + ?Sized>(store: &S, key: &str, value: &Value) -> StoreResult<()> {
    store.set_item(key, &value.to_string())
}

/// Arguments reported with a response event. `get-item` reports key and
/// value, acknowledgements report nothing, the rest report their payload.
fn response_log_args(response: &Response) -> Vec<Value> {
    match response {
        Response::GetItem { key, value } => vec![Value::from(key.as_str()), value.clone()],
        Response::GetItems(_) | Response::EnumKeys(_) => vec![response.payload()],
        Response::SetItem
        | Response::SetItems
        | Response::RemoveItem
        | Response::Clear
        | Response::PushToSet
        | Response::RemoveFromSet => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::logger::RecordingLogger;
    use portkv_store::{InMemoryStorage, StoreError};
    use serde_json::json;

    fn bridge() -> Bridge<InMemoryStorage> {
        Bridge::new(InMemoryStorage::new())
    }

    // -----------------------------------------------------------------------
    // Primitives
    // -----------------------------------------------------------------------

    #[test]
    fn set_then_get_round_trips() {
        let b = bridge();
        b.set_item(&Entry::new("a", json!({"x": 1}))).unwrap();
        assert_eq!(b.get_item("a").unwrap(), json!({"x": 1}));
        assert_eq!(b.store().get_item("a").unwrap().as_deref(), Some(r#"{"x":1}"#));
    }

    #[test]
    fn missing_key_reads_null() {
        assert_eq!(bridge().get_item("nope").unwrap(), Value::Null);
    }

    #[test]
    fn corrupt_text_reads_null() {
        let b = bridge();
        b.store().set_item("bad", "{oops").unwrap();
        assert_eq!(b.get_item("bad").unwrap(), Value::Null);
    }

    #[test]
    fn get_items_omits_null_values() {
        let b = bridge();
        b.set_item(&Entry::new("k2", json!("v"))).unwrap();
        b.set_item(&Entry::new("k3", Value::Null)).unwrap();
        let entries = b
            .get_items(&["k1".into(), "k2".into(), "k3".into()])
            .unwrap();
        assert_eq!(entries, vec![Entry::new("k2", json!("v"))]);
    }

    #[test]
    fn get_items_keeps_request_order() {
        let b = bridge();
        b.set_items(&[Entry::new("a", json!(1)), Entry::new("b", json!(2))])
            .unwrap();
        let entries = b.get_items(&["b".into(), "a".into()]).unwrap();
        assert_eq!(entries, vec![Entry::new("b", json!(2)), Entry::new("a", json!(1))]);
    }

    #[test]
    fn clear_empties_enumeration() {
        let b = bridge();
        b.set_item(&Entry::new("a", json!(1))).unwrap();
        b.clear().unwrap();
        assert!(b.enum_keys().unwrap().is_empty());
        // Clearing an empty store is fine too.
        b.clear().unwrap();
    }

    // -----------------------------------------------------------------------
    // Sets
    // -----------------------------------------------------------------------

    #[test]
    fn push_to_set_twice_keeps_one() {
        let b = bridge();
        let entry = Entry::new("tags", json!("x"));
        b.push_to_set(&entry).unwrap();
        b.push_to_set(&entry).unwrap();
        assert_eq!(b.get_item("tags").unwrap(), json!(["x"]));
    }

    #[test]
    fn push_to_set_replaces_scalar() {
        let b = bridge();
        b.set_item(&Entry::new("tags", json!(7))).unwrap();
        b.push_to_set(&Entry::new("tags", json!("x"))).unwrap();
        assert_eq!(b.get_item("tags").unwrap(), json!(["x"]));
    }

    #[test]
    fn remove_from_set_filters_list() {
        let b = bridge();
        b.set_item(&Entry::new("list", json!([1, 2, 3]))).unwrap();
        let outcome = b.remove_from_set(&Entry::new("list", json!(2))).unwrap();
        assert_eq!(outcome, SetRemoval::Updated);
        assert_eq!(b.get_item("list").unwrap(), json!([1, 3]));
    }

    #[test]
    fn remove_from_set_on_scalar_leaves_value() {
        let b = bridge();
        b.set_item(&Entry::new("scalar", json!(5))).unwrap();
        let outcome = b.remove_from_set(&Entry::new("scalar", json!(5))).unwrap();
        assert_eq!(outcome, SetRemoval::NotAList(json!(5)));
        assert_eq!(b.get_item("scalar").unwrap(), json!(5));
    }

    #[test]
    fn remove_from_set_on_missing_key_aborts() {
        let b = bridge();
        let outcome = b.remove_from_set(&Entry::new("none", json!(1))).unwrap();
        assert_eq!(outcome, SetRemoval::NotAList(Value::Null));
        assert!(b.enum_keys().unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // execute + logging
    // -----------------------------------------------------------------------

    #[test]
    fn execute_logs_command_and_response() {
        let log = RecordingLogger::new();
        let b = Bridge::with_logger(InMemoryStorage::new(), log.clone());
        b.execute(Command::SetItem(Entry::new("a", json!(1)))).unwrap();
        b.execute(Command::GetItem { key: "a".into() }).unwrap();

        let events = log.events();
        assert_eq!(
            log.names(),
            vec![
                "storageSetItem",
                "storageSetItemResponse",
                "storageGetItem",
                "storageGetItemResponse",
            ]
        );
        assert_eq!(events[0].args, vec![json!("a"), json!(1)]);
        assert!(events[1].args.is_empty());
        assert_eq!(events[3].args, vec![json!("a"), json!(1)]);
    }

    #[test]
    fn execute_abort_logs_distinct_event() {
        let log = RecordingLogger::new();
        let b = Bridge::with_logger(InMemoryStorage::new(), log.clone());
        b.set_item(&Entry::new("scalar", json!(5))).unwrap();

        let response = b
            .execute(Command::RemoveFromSet(Entry::new("scalar", json!(5))))
            .unwrap();
        assert!(response.is_none());
        assert_eq!(
            log.names(),
            vec!["storageRemoveFromSet", REMOVE_FROM_SET_ABORT_EVENT]
        );
        assert_eq!(log.events()[1].args, vec![json!("scalar"), json!(5), json!(5)]);
    }

    #[test]
    fn execute_enum_keys_logs_payload() {
        let log = RecordingLogger::new();
        let b = Bridge::with_logger(InMemoryStorage::new(), log.clone());
        b.set_item(&Entry::new("a", json!(1))).unwrap();
        let response = b.execute(Command::EnumKeys).unwrap();
        assert_eq!(response, Some(Response::EnumKeys(vec!["a".into()])));
        assert_eq!(log.events()[1].args, vec![json!(["a"])]);
    }

    #[test]
    fn backend_failure_propagates_without_response_log() {
        let log = RecordingLogger::new();
        let b = Bridge::with_logger(InMemoryStorage::with_quota(Some(4)), log.clone());
        let err = b
            .execute(Command::SetItem(Entry::new("key", json!("too long"))))
            .unwrap_err();
        assert!(matches!(err, BridgeError::Store(StoreError::QuotaExceeded { .. })));
        assert_eq!(log.names(), vec!["storageSetItem"]);
    }

    #[test]
    fn set_items_stops_at_first_failure() {
        // "a" + "1" and "b" + "2" fit in 4 bytes; "c" + "3" does not.
        let b = Bridge::new(InMemoryStorage::with_quota(Some(4)));
        let entries = vec![
            Entry::new("a", json!(1)),
            Entry::new("b", json!(2)),
            Entry::new("c", json!(3)),
            Entry::new("d", json!(4)),
        ];
        assert!(b.set_items(&entries).is_err());
        assert_eq!(b.enum_keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn from_config_selects_logger() {
        let quiet = Bridge::from_config(InMemoryStorage::new(), &BridgeConfig::default());
        let loud = Bridge::from_config(InMemoryStorage::new(), &BridgeConfig::verbose());
        quiet.execute(Command::Clear).unwrap();
        loud.execute(Command::Clear).unwrap();
    }
}
