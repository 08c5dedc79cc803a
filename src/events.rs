//! Typed events decoded from record payloads.
//!
//! The wire decoder in [`crate::sse`] is deliberately dumb: it hands over
//! raw `{event, data}` records. This module is the optional layer on top
//! that interprets the payload JSON for the event types the backend emits
//! during a run. Unknown event types are carried through as
//! [`TaskEvent::Unknown`] rather than rejected, so older clients survive
//! newer backends.

use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;

use crate::sse::SseRecord;

/// Token usage accumulated across model calls in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ModelsUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl ModelsUsage {
    /// Accumulate another usage report into this one.
    pub fn add(&mut self, other: &ModelsUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
    }
}

impl std::fmt::Display for ModelsUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Prompt Tokens: {}, Completion Tokens: {}",
            self.prompt_tokens, self.completion_tokens
        )
    }
}

/// Final result of a run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    pub messages: Vec<serde_json::Value>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<ModelsUsage>,
}

/// Errors decoding a record payload into a typed event.
#[derive(Debug, Error)]
pub enum EventParseError {
    #[error("invalid JSON for event '{event_type}': {source}")]
    InvalidJson {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct TextMessagePayload {
    #[serde(default)]
    source: String,
    #[serde(default, alias = "text", alias = "data")]
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorPayload {
    message: String,
}

/// A typed event from a streaming run.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    /// A chunk of agent output
    TextMessage { source: String, content: String },
    /// The run finished and produced a result
    Result(TaskResult),
    /// The backend reported an error
    Error { message: String },
    /// Event type this client does not know about
    Unknown { event: String, data: Bytes },
}

impl TaskEvent {
    /// Decode a raw record into a typed event.
    ///
    /// The record's event field is trimmed before matching; the wire decoder
    /// keeps the space after `event:` and that is not significant here.
    pub fn parse(record: &SseRecord) -> Result<TaskEvent, EventParseError> {
        let event_type = record.event.trim();
        match event_type {
            "message" | "text_message" => {
                let payload: TextMessagePayload = decode(event_type, &record.data)?;
                Ok(TaskEvent::TextMessage {
                    source: payload.source,
                    content: payload.content,
                })
            }
            "result" | "task_result" => {
                let payload: TaskResult = decode(event_type, &record.data)?;
                Ok(TaskEvent::Result(payload))
            }
            "error" => {
                let payload: ErrorPayload = decode(event_type, &record.data)?;
                Ok(TaskEvent::Error {
                    message: payload.message,
                })
            }
            _ => {
                tracing::debug!("unrecognized event type: {event_type:?}");
                Ok(TaskEvent::Unknown {
                    event: event_type.to_string(),
                    data: record.data.clone(),
                })
            }
        }
    }
}

fn decode<'a, T: Deserialize<'a>>(event_type: &str, data: &'a [u8]) -> Result<T, EventParseError> {
    serde_json::from_slice(data).map_err(|source| EventParseError::InvalidJson {
        event_type: event_type.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(event: &str, data: &'static [u8]) -> SseRecord {
        SseRecord {
            event: event.to_string(),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn test_parse_text_message() {
        let rec = record(" message", br#" {"source": "planner", "content": "Hello"}"#);
        let event = TaskEvent::parse(&rec).unwrap();
        assert_eq!(
            event,
            TaskEvent::TextMessage {
                source: "planner".to_string(),
                content: "Hello".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_text_message_content_aliases() {
        let rec = record("message", br#"{"text": "aliased"}"#);
        match TaskEvent::parse(&rec).unwrap() {
            TaskEvent::TextMessage { source, content } => {
                assert_eq!(source, "");
                assert_eq!(content, "aliased");
            }
            other => panic!("expected TextMessage, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_result_with_usage() {
        let rec = record(
            "result",
            br#"{"messages": [], "stop_reason": "completed", "usage": {"prompt_tokens": 10, "completion_tokens": 5}}"#,
        );
        match TaskEvent::parse(&rec).unwrap() {
            TaskEvent::Result(result) => {
                assert_eq!(result.stop_reason.as_deref(), Some("completed"));
                assert_eq!(
                    result.usage,
                    Some(ModelsUsage {
                        prompt_tokens: 10,
                        completion_tokens: 5,
                    })
                );
            }
            other => panic!("expected Result, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_event() {
        let rec = record("error", br#"{"message": "model overloaded"}"#);
        assert_eq!(
            TaskEvent::parse(&rec).unwrap(),
            TaskEvent::Error {
                message: "model overloaded".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_event_passes_through() {
        let rec = record(" heartbeat", b"{}");
        match TaskEvent::parse(&rec).unwrap() {
            TaskEvent::Unknown { event, .. } => assert_eq!(event, "heartbeat"),
            other => panic!("expected Unknown, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let rec = record("message", b"not json");
        assert!(matches!(
            TaskEvent::parse(&rec),
            Err(EventParseError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_usage_accumulates() {
        let mut total = ModelsUsage::default();
        total.add(&ModelsUsage {
            prompt_tokens: 3,
            completion_tokens: 4,
        });
        total.add(&ModelsUsage {
            prompt_tokens: 7,
            completion_tokens: 6,
        });
        assert_eq!(total.prompt_tokens, 10);
        assert_eq!(total.completion_tokens, 10);
        assert_eq!(total.to_string(), "Prompt Tokens: 10, Completion Tokens: 10");
    }
}
