use std::collections::HashMap;
use std::sync::mpsc;

use portkv_protocol::{Channel, Command, PortMessage, Response};
use portkv_store::StorageBackend;
use serde_json::Value;

use crate::bridge::Bridge;
use crate::error::{BridgeError, BridgeResult};

/// Outbound side of the port boundary.
pub trait ResponsePort {
    fn send(&mut self, message: PortMessage);
}

impl ResponsePort for Vec<PortMessage> {
    fn send(&mut self, message: PortMessage) {
        self.push(message);
    }
}

impl ResponsePort for mpsc::Sender<PortMessage> {
    fn send(&mut self, message: PortMessage) {
        // A dropped receiver means nobody is listening any more.
        let _ = mpsc::Sender::send(self, message);
    }
}

type Handler<S> = fn(&Bridge<S>, Value) -> BridgeResult<Option<Response>>;

/// Routes inbound port messages to their handlers.
///
/// Holds one handler per inbound storage port, keyed by port name, and sends
/// each handler's response on the caller's [`ResponsePort`]. Dispatch is
/// synchronous: a message is fully handled, and its response sent, before
/// `dispatch` returns.
pub struct Dispatcher<S> {
    bridge: Bridge<S>,
    handlers: HashMap<&'static str, Handler<S>>,
}

impl<S: StorageBackend> Dispatcher<S> {
    /// Register a handler for every storage port.
    pub fn register(bridge: Bridge<S>) -> Self {
        let mut handlers: HashMap<&'static str, Handler<S>> = HashMap::new();
        handlers.insert(Channel::GetItem.name(), |b, p| {
            b.execute(Command::decode(Channel::GetItem, p)?)
        });
        handlers.insert(Channel::GetItems.name(), |b, p| {
            b.execute(Command::decode(Channel::GetItems, p)?)
        });
        handlers.insert(Channel::SetItem.name(), |b, p| {
            b.execute(Command::decode(Channel::SetItem, p)?)
        });
        handlers.insert(Channel::SetItems.name(), |b, p| {
            b.execute(Command::decode(Channel::SetItems, p)?)
        });
        handlers.insert(Channel::RemoveItem.name(), |b, p| {
            b.execute(Command::decode(Channel::RemoveItem, p)?)
        });
        handlers.insert(Channel::Clear.name(), |b, _| b.execute(Command::Clear));
        handlers.insert(Channel::PushToSet.name(), |b, p| {
            b.execute(Command::decode(Channel::PushToSet, p)?)
        });
        handlers.insert(Channel::RemoveFromSet.name(), |b, p| {
            b.execute(Command::decode(Channel::RemoveFromSet, p)?)
        });
        handlers.insert(Channel::EnumKeys.name(), |b, _| b.execute(Command::EnumKeys));
        Self { bridge, handlers }
    }

    pub fn bridge(&self) -> &Bridge<S> {
        &self.bridge
    }

    /// Registered inbound port names in protocol order.
    pub fn channels(&self) -> Vec<&'static str> {
        Channel::ALL
            .into_iter()
            .map(Channel::name)
            .filter(|name| self.handlers.contains_key(name))
            .collect()
    }

    /// Handle one inbound message. Returns `true` if a response was sent.
    ///
    /// Unknown ports and malformed payloads are rejected before the backend
    /// is touched. Backend failures propagate and nothing is sent.
    pub fn dispatch(
        &self,
        message: PortMessage,
        port: &mut dyn ResponsePort,
    ) -> BridgeResult<bool> {
        let handler = self
            .handlers
            .get(message.port.as_str())
            .ok_or_else(|| BridgeError::UnknownChannel(message.port.clone()))?;
        match handler(&self.bridge, message.payload)? {
            Some(response) => {
                port.send(response.into_message());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<S> std::fmt::Debug for Dispatcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handler_count", &self.handlers.len())
            .finish()
    }
}
