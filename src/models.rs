//! Request models for the streaming API.

use serde::{Deserialize, Serialize};

/// Body of a stream request.
///
/// `session_id` continues an existing run session; omitting it starts a new
/// one. `user_id` is only needed against multi-tenant deployments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRequest {
    /// The task prompt to run
    pub task: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl StreamRequest {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            session_id: None,
            user_id: None,
        }
    }

    pub fn with_session(mut self, session_id: i64) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}
