use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

/// Port a host can probe to tell whether an application exposes the storage
/// ports at all.
pub const SAMPLE_PORT_NAME: &str = Channel::GetItem.name();

/// Inbound command ports. Each has exactly one paired response port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    GetItem,
    GetItems,
    SetItem,
    SetItems,
    RemoveItem,
    Clear,
    PushToSet,
    RemoveFromSet,
    EnumKeys,
}

impl Channel {
    pub const ALL: [Channel; 9] = [
        Channel::GetItem,
        Channel::GetItems,
        Channel::SetItem,
        Channel::SetItems,
        Channel::RemoveItem,
        Channel::Clear,
        Channel::PushToSet,
        Channel::RemoveFromSet,
        Channel::EnumKeys,
    ];

    /// Inbound port name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetItem => "storageGetItem",
            Self::GetItems => "storageGetItems",
            Self::SetItem => "storageSetItem",
            Self::SetItems => "storageSetItems",
            Self::RemoveItem => "storageRemoveItem",
            Self::Clear => "storageClear",
            Self::PushToSet => "storagePushToSet",
            Self::RemoveFromSet => "storageRemoveFromSet",
            Self::EnumKeys => "storageEnumKeys",
        }
    }

    /// Paired outbound port name.
    pub const fn response_name(self) -> &'static str {
        match self {
            Self::GetItem => "storageGetItemResponse",
            Self::GetItems => "storageGetItemsResponse",
            Self::SetItem => "storageSetItemResponse",
            Self::SetItems => "storageSetItemsResponse",
            Self::RemoveItem => "storageRemoveItemResponse",
            Self::Clear => "storageClearResponse",
            Self::PushToSet => "storagePushToSetResponse",
            Self::RemoveFromSet => "storageRemoveFromSetResponse",
            Self::EnumKeys => "storageEnumKeysResponse",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl FromStr for Channel {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ProtocolError::UnknownChannel(s.to_string()))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether an application's port list includes the storage ports.
pub fn has_storage_ports<'a>(ports: impl IntoIterator<Item = &'a str>) -> bool {
    ports.into_iter().any(|p| p == SAMPLE_PORT_NAME)
}
