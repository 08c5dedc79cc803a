//! The decoded SSE record type.

use bytes::Bytes;

/// One decoded record from the backend event stream.
///
/// `event` is whatever followed the `event:` prefix on the most recent type
/// line, or empty if no type line preceded the flushing `data:` line. `data`
/// holds the raw bytes after the `data:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseRecord {
    /// Event type, may be empty
    pub event: String,
    /// Raw payload bytes
    pub data: Bytes,
}

impl SseRecord {
    /// Payload interpreted as UTF-8, with invalid sequences replaced.
    pub fn data_utf8(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}
