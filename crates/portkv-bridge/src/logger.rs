//! The port logging callback.
//!
//! Every handled command is reported twice: once before it runs, under the
//! command's port name with its arguments, and once after, under the response
//! port name with the response. A host that does not care passes nothing and
//! gets [`NoopLogger`].

use std::sync::{Arc, Mutex};

use serde_json::Value;

/// Receives `(event name, arguments)` for every port event.
pub trait PortLogger: Send + Sync {
    fn log(&self, event: &str, args: &[Value]);
}

impl<F> PortLogger for F
where
    F: Fn(&str, &[Value]) + Send + Sync,
{
    fn log(&self, event: &str, args: &[Value]) {
        self(event, args)
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;

impl PortLogger for NoopLogger {
    fn log(&self, _event: &str, _args: &[Value]) {}
}

/// Forwards events to `tracing` at debug level under the `portkv::ports`
/// target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl PortLogger for TracingLogger {
    fn log(&self, event: &str, args: &[Value]) {
        let args = Value::Array(args.to_vec());
        tracing::debug!(
            target: "portkv::ports",
            port = event,
            args = %args,
            "port event"
        );
    }
}

/// One recorded port event.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEvent {
    pub event: String,
    pub args: Vec<Value>,
}

/// Keeps every event in memory. Clones share the same buffer, so a test can
/// hand one clone to a bridge and inspect the other.
#[derive(Clone, Debug, Default)]
pub struct RecordingLogger {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().expect("lock poisoned").clone()
    }

    /// Event names only, in order.
    pub fn names(&self) -> Vec<String> {
        self.events
            .lock()
            .expect("lock poisoned")
            .iter()
            .map(|e| e.event.clone())
            .collect()
    }
}

impl PortLogger for RecordingLogger {
    fn log(&self, event: &str, args: &[Value]) {
        self.events.lock().expect("lock poisoned").push(LogEvent {
            event: event.to_string(),
            args: args.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn closures_are_loggers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let logger = move |event: &str, args: &[Value]| {
            sink.lock().unwrap().push((event.to_string(), args.len()));
        };
        logger.log("storageClear", &[]);
        logger.log("storageGetItem", &[json!("k")]);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("storageClear".to_string(), 0), ("storageGetItem".to_string(), 1)]
        );
    }

    #[test]
    fn recording_clones_share_buffer() {
        let logger = RecordingLogger::new();
        let handle = logger.clone();
        logger.log("storageEnumKeys", &[]);
        assert_eq!(handle.names(), vec!["storageEnumKeys"]);
        assert_eq!(
            handle.events()[0],
            LogEvent { event: "storageEnumKeys".into(), args: vec![] }
        );
    }

    #[test]
    fn noop_and_tracing_do_not_panic() {
        NoopLogger.log("storageClear", &[]);
        TracingLogger.log("storageGetItem", &[json!("k")]);
    }
}
