use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::channel::Channel;
use crate::error::{ProtocolError, ProtocolResult};

/// A message on a named port: the wire envelope for both directions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortMessage {
    pub port: String,
    #[serde(default)]
    pub payload: Value,
}

impl PortMessage {
    pub fn new(port: impl Into<String>, payload: Value) -> Self {
        Self {
            port: port.into(),
            payload,
        }
    }
}

/// A key and its decoded value.
///
/// On the wire an entry is the positional pair `[key, value]`. The record
/// form `{"key": .., "value": ..}` is accepted on input as well.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "EntryRepr", into = "(String, Value)")]
pub struct Entry {
    pub key: String,
    pub value: Value,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntryRepr {
    Pair(String, Value),
    Record { key: String, value: Value },
}

impl From<EntryRepr> for Entry {
    fn from(repr: EntryRepr) -> Self {
        match repr {
            EntryRepr::Pair(key, value) | EntryRepr::Record { key, value } => Entry { key, value },
        }
    }
}

impl From<Entry> for (String, Value) {
    fn from(entry: Entry) -> Self {
        (entry.key, entry.value)
    }
}

/// A decoded inbound command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    GetItem { key: String },
    GetItems { keys: Vec<String> },
    SetItem(Entry),
    SetItems(Vec<Entry>),
    RemoveItem { key: String },
    Clear,
    PushToSet(Entry),
    RemoveFromSet(Entry),
    EnumKeys,
}

fn parse<T: DeserializeOwned>(channel: Channel, payload: Value) -> ProtocolResult<T> {
    serde_json::from_value(payload).map_err(|e| ProtocolError::InvalidPayload {
        channel: channel.name(),
        reason: e.to_string(),
    })
}

impl Command {
    /// Decode the payload received on `channel`.
    ///
    /// `storageClear` and `storageEnumKeys` carry no arguments; whatever
    /// payload arrives on them is ignored.
    pub fn decode(channel: Channel, payload: Value) -> ProtocolResult<Self> {
        Ok(match channel {
            Channel::GetItem => Self::GetItem {
                key: parse(channel, payload)?,
            },
            Channel::GetItems => Self::GetItems {
                keys: parse(channel, payload)?,
            },
            Channel::SetItem => Self::SetItem(parse(channel, payload)?),
            Channel::SetItems => Self::SetItems(parse(channel, payload)?),
            Channel::RemoveItem => Self::RemoveItem {
                key: parse(channel, payload)?,
            },
            Channel::Clear => Self::Clear,
            Channel::PushToSet => Self::PushToSet(parse(channel, payload)?),
            Channel::RemoveFromSet => Self::RemoveFromSet(parse(channel, payload)?),
            Channel::EnumKeys => Self::EnumKeys,
        })
    }

    /// Decode an inbound envelope, resolving its port name.
    pub fn from_message(message: PortMessage) -> ProtocolResult<Self> {
        let channel: Channel = message.port.parse()?;
        Self::decode(channel, message.payload)
    }

    pub fn channel(&self) -> Channel {
        match self {
            Self::GetItem { .. } => Channel::GetItem,
            Self::GetItems { .. } => Channel::GetItems,
            Self::SetItem(_) => Channel::SetItem,
            Self::SetItems(_) => Channel::SetItems,
            Self::RemoveItem { .. } => Channel::RemoveItem,
            Self::Clear => Channel::Clear,
            Self::PushToSet(_) => Channel::PushToSet,
            Self::RemoveFromSet(_) => Channel::RemoveFromSet,
            Self::EnumKeys => Channel::EnumKeys,
        }
    }

    /// Arguments as they are reported to a port logger.
    pub fn log_args(&self) -> Vec<Value> {
        match self {
            Self::GetItem { key } | Self::RemoveItem { key } => vec![Value::from(key.as_str())],
            Self::GetItems { keys } => vec![Value::from(keys.clone())],
            Self::SetItem(entry) | Self::PushToSet(entry) | Self::RemoveFromSet(entry) => {
                vec![Value::from(entry.key.as_str()), entry.value.clone()]
            }
            Self::SetItems(entries) => vec![entries_to_value(entries)],
            Self::Clear | Self::EnumKeys => Vec::new(),
        }
    }

    /// Re-encode as an inbound envelope.
    pub fn into_message(self) -> PortMessage {
        let channel = self.channel();
        let payload = match self {
            Self::GetItem { key } | Self::RemoveItem { key } => Value::String(key),
            Self::GetItems { keys } => Value::from(keys),
            Self::SetItem(entry) | Self::PushToSet(entry) | Self::RemoveFromSet(entry) => {
                entry_to_value(entry)
            }
            Self::SetItems(entries) => entries_to_value(&entries),
            Self::Clear | Self::EnumKeys => Value::Null,
        };
        PortMessage::new(channel.name(), payload)
    }
}

fn entry_to_value(entry: Entry) -> Value {
    Value::Array(vec![Value::String(entry.key), entry.value])
}

fn entries_to_value(entries: &[Entry]) -> Value {
    Value::Array(entries.iter().cloned().map(entry_to_value).collect())
}

/// An outbound response, one variant per response port.
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    /// `[key, value-or-null]`
    GetItem { key: String, value: Value },
    /// `[[key, value], ...]`
    GetItems(Vec<Entry>),
    SetItem,
    SetItems,
    RemoveItem,
    Clear,
    PushToSet,
    RemoveFromSet,
    EnumKeys(Vec<String>),
}

impl Response {
    /// The inbound channel this response answers.
    pub fn channel(&self) -> Channel {
        match self {
            Self::GetItem { .. } => Channel::GetItem,
            Self::GetItems(_) => Channel::GetItems,
            Self::SetItem => Channel::SetItem,
            Self::SetItems => Channel::SetItems,
            Self::RemoveItem => Channel::RemoveItem,
            Self::Clear => Channel::Clear,
            Self::PushToSet => Channel::PushToSet,
            Self::RemoveFromSet => Channel::RemoveFromSet,
            Self::EnumKeys(_) => Channel::EnumKeys,
        }
    }

    pub fn port_name(&self) -> &'static str {
        self.channel().response_name()
    }

    /// The JSON payload sent on the response port. Acknowledgements are `null`.
    pub fn payload(&self) -> Value {
        match self {
            Self::GetItem { key, value } => {
                Value::Array(vec![Value::from(key.as_str()), value.clone()])
            }
            Self::GetItems(entries) => entries_to_value(entries),
            Self::EnumKeys(keys) => Value::from(keys.clone()),
            Self::SetItem
            | Self::SetItems
            | Self::RemoveItem
            | Self::Clear
            | Self::PushToSet
            | Self::RemoveFromSet => Value::Null,
        }
    }

    pub fn into_message(self) -> PortMessage {
        PortMessage::new(self.port_name(), self.payload())
    }
}
