//! Wire types for the chat server.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
}

/// Successful `POST /chat` body. The server may echo other fields
/// (`user_message`); they are ignored.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
}

/// `GET /config`: how the server wants the chat presented.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ServerProfile {
    #[serde(default)]
    pub bot_name: Option<String>,
    #[serde(default)]
    pub greeting_message: Option<String>,
}

/// `GET /health`. Only `status` is required; anything else the server reports
/// is kept for display.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
