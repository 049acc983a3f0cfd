//! HTTP implementation of [`ChatBackend`] using `reqwest`.
//!
//! One JSON `POST /chat` per user turn. No timeout is configured beyond
//! reqwest's defaults and nothing is retried.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::client::{BackendError, ChatBackend};
use super::types::{ChatReply, ChatRequest, HealthStatus, ServerProfile};

pub const CHAT_PATH: &str = "/chat";
pub const PROFILE_PATH: &str = "/config";
pub const HEALTH_PATH: &str = "/health";

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a response to `T`: non-2xx becomes `Status`, a bad body `Parse`.
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        debug!("Backend response status: {}", status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Backend error: {} - {}", status.as_u16(), body);
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn send_message(&self, message: &str) -> Result<String, BackendError> {
        let request = ChatRequest {
            message: message.to_string(),
        };

        info!(
            "POST {} (message_len={})",
            self.url(CHAT_PATH),
            request.message.len()
        );

        // `.json()` sets Content-Type: application/json
        let response = self
            .client
            .post(self.url(CHAT_PATH))
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let reply: ChatReply = Self::read_json(response).await?;
        debug!("Reply received: {} bytes", reply.response.len());
        Ok(reply.response)
    }

    async fn fetch_profile(&self) -> Result<ServerProfile, BackendError> {
        self.get_json(PROFILE_PATH).await
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        self.get_json(HEALTH_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let backend = HttpBackend::new("http://localhost:5000/");
        assert_eq!(backend.base_url(), "http://localhost:5000");
        assert_eq!(backend.url(CHAT_PATH), "http://localhost:5000/chat");
    }

    #[test]
    fn base_url_path_prefix_is_kept() {
        let backend = HttpBackend::new("https://example.com/bot");
        assert_eq!(backend.url(HEALTH_PATH), "https://example.com/bot/health");
    }
}
