//! Line splitting and record decoding.
//!
//! `LineBuffer` turns arbitrary byte chunks into complete lines;
//! `SseDecoder` turns lines into records. Both are synchronous and hold no
//! I/O; the producer task in [`crate::stream`] drives them.

use bytes::{Bytes, BytesMut};

use super::SseRecord;

const EVENT_PREFIX: &[u8] = b"event:";
const DATA_PREFIX: &[u8] = b"data:";

/// Splits incoming byte chunks into lines.
///
/// Lines end at `\n`; a single trailing `\r` before it is stripped, so both
/// `\n` and `\r\n` conventions work. Bytes after the last newline stay
/// buffered until more data arrives or [`LineBuffer::take_remainder`] flushes
/// them at end of stream.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: BytesMut,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of bytes from the stream.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Pop the next complete line, without its terminator.
    pub fn next_line(&mut self) -> Option<Bytes> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line = self.buf.split_to(pos + 1);
        line.truncate(pos);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
        Some(line.freeze())
    }

    /// Flush the final unterminated line at end of stream, if any.
    pub fn take_remainder(&mut self) -> Option<Bytes> {
        if self.buf.is_empty() {
            return None;
        }
        let mut line = self.buf.split();
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
        Some(line.freeze())
    }
}

/// Stateful decoder that accumulates one pending record.
///
/// An `event:` line sets the pending record's type. A `data:` line sets its
/// payload and flushes it; the decoder then starts a fresh empty record.
/// There is no multi-line data folding - every `data:` line flushes - and a
/// pending type with no following `data:` line is simply dropped when the
/// stream ends.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: SseRecord,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without terminator), possibly completing a record.
    ///
    /// Lines matching neither prefix are ignored; this covers comments,
    /// keep-alives and blank separator lines.
    pub fn feed_line(&mut self, line: &[u8]) -> Option<SseRecord> {
        if let Some(rest) = line.strip_prefix(EVENT_PREFIX) {
            self.pending.event = String::from_utf8_lossy(rest).into_owned();
            None
        } else if let Some(rest) = line.strip_prefix(DATA_PREFIX) {
            self.pending.data = Bytes::copy_from_slice(rest);
            Some(std::mem::take(&mut self.pending))
        } else {
            None
        }
    }
}
