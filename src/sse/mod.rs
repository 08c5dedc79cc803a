//! SSE (Server-Sent Events) stream decoder
//!
//! Decodes the Maestro backend streaming format. Each record is signaled by
//! a `data:`-prefixed line, optionally preceded by an `event:` type line:
//! - `event: <type>` - sets the type of the record being accumulated
//! - `data: <payload>` - completes the record and flushes it
//! - anything else - ignored
//!
//! The prefixes are matched literally and the remainder of the line is kept
//! as-is, including any leading space after the colon. Callers that need the
//! full SSE trimming rules must pre-process.
//!
//! # Module structure
//! - `record` - the decoded record type (`SseRecord`)
//! - `decoder` - line splitting and decoding (`LineBuffer`, `SseDecoder`)

mod decoder;
mod record;

pub use decoder::{LineBuffer, SseDecoder};
pub use record::SseRecord;
