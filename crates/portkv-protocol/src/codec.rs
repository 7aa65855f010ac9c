use crate::error::{ProtocolError, ProtocolResult};
use crate::message::PortMessage;

/// Largest accepted encoded message, excluding the line terminator.
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Newline-delimited JSON framing for [`PortMessage`]s.
///
/// One envelope per line: `{"port":"storageGetItem","payload":"a"}\n`.
/// `serde_json` never emits raw newlines inside a document, so a line is
/// always exactly one message.
pub struct LineCodec;

impl LineCodec {
    /// Encode a message as a single `\n`-terminated line.
    pub fn encode(msg: &PortMessage) -> ProtocolResult<Vec<u8>> {
        let mut buf =
            serde_json::to_vec(msg).map_err(|e| ProtocolError::Serialization(e.to_string()))?;
        if buf.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: buf.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        buf.push(b'\n');
        Ok(buf)
    }

    /// Decode one line. A trailing `\n` or `\r\n` is ignored.
    pub fn decode(line: &[u8]) -> ProtocolResult<PortMessage> {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: line.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        serde_json::from_slice(line).map_err(|e| ProtocolError::Deserialization(e.to_string()))
    }
}
