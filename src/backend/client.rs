use std::fmt;

use async_trait::async_trait;

use super::types::{HealthStatus, ServerProfile};

/// Errors from a backend exchange.
///
/// The chat surface treats every variant the same way (fallback reply), but
/// the distinction is kept for logs and for `--health`.
#[derive(Debug)]
pub enum BackendError {
    /// Connection refused, DNS failure, reset, or any other transport error.
    Network(String),
    /// The server answered with a non-2xx status.
    Status { status: u16, body: String },
    /// The body was not the JSON we expected.
    Parse(String),
}

impl BackendError {
    /// Whether a retry could plausibly succeed. Informational only: the client
    /// never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Network(_) => true,
            BackendError::Status { status, .. } => *status >= 500 || *status == 429,
            BackendError::Parse(_) => false,
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Status { status, body } => {
                write!(f, "server error (HTTP {status}): {body}")
            }
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Send one user message and return the reply markup.
    async fn send_message(&self, message: &str) -> Result<String, BackendError>;

    /// Fetch the server's display profile (bot name, greeting).
    async fn fetch_profile(&self) -> Result<ServerProfile, BackendError>;

    /// Query the server's health endpoint.
    async fn health(&self) -> Result<HealthStatus, BackendError>;
}
