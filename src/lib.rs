//! Maestro client - streaming client library for the Maestro
//! agent-orchestration backend.
//!
//! The backend delivers run output as Server-Sent Events (SSE). This crate
//! decodes that byte stream into discrete records and hands them to the
//! consumer over a bounded channel:
//!
//! - [`sse`] - the line-level decoder (`event:` / `data:` prefix handling)
//! - [`stream`] - the producer task and channel hand-off
//! - [`events`] - optional typed decoding of record payloads
//! - [`client`] - the HTTP client that opens streams against the backend

pub mod client;
pub mod events;
pub mod models;
pub mod sse;
pub mod stream;

pub use client::{ClientError, MaestroClient};
pub use sse::{SseDecoder, SseRecord};
pub use stream::{spawn_decoder, RecordStream, StreamError};
