//! HTTP client for the Maestro backend.
//!
//! Opens streaming runs against the backend and hands the response body to
//! the decoder in [`crate::stream`]. Non-streaming concerns (resource CRUD,
//! authorization, reconciliation) live server-side and are not mirrored
//! here.

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::models::StreamRequest;
use crate::stream::{spawn_decoder, RecordStream};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8081";

/// Error type for client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// The requested resource does not exist
    #[error("not found")]
    NotFound,
    /// Server returned a non-success status
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

/// Client for the Maestro streaming API.
pub struct MaestroClient {
    base_url: String,
    auth_token: Option<String>,
    client: Client,
}

impl MaestroClient {
    /// Create a client against the default local backend.
    pub fn new() -> Self {
        Self::with_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL.
    pub fn with_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            client: Client::new(),
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_auth(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    /// Start a streaming run and return the decoded record stream.
    ///
    /// Sends a POST to `/api/runs/stream`; the response body is consumed by
    /// a background task which owns it until the stream ends or the returned
    /// handle is dropped.
    pub async fn stream(&self, request: &StreamRequest) -> Result<RecordStream, ClientError> {
        let url = format!("{}/api/runs/stream", self.base_url);

        let mut req = self
            .client
            .post(&url)
            .header("Accept", "text/event-stream")
            .json(request);
        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!("stream opened at {url}");
        Ok(spawn_decoder(Box::pin(response.bytes_stream())))
    }

    /// Check whether the backend is healthy and reachable.
    pub async fn health_check(&self) -> Result<bool, ClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

impl Default for MaestroClient {
    fn default() -> Self {
        Self::new()
    }
}
