//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::backend::{BackendError, ChatBackend, HealthStatus, ServerProfile};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;

/// A backend that replays scripted replies and records what it was sent.
/// Runs out of script → `Network` error.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, BackendError>>>,
    pub sent: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<String, BackendError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send_message(&self, message: &str) -> Result<String, BackendError> {
        self.sent.lock().unwrap().push(message.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Network("script exhausted".into())))
    }

    async fn fetch_profile(&self) -> Result<ServerProfile, BackendError> {
        Ok(ServerProfile::default())
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        Err(BackendError::Network("not scripted".into()))
    }
}

pub fn test_config() -> ResolvedConfig {
    ResolvedConfig {
        base_url: "http://localhost:5000".to_string(),
        bot_name: "Test Bot".to_string(),
        greeting: None,
        sanitize_bot_html: false,
    }
}

/// Creates a test App with an empty scripted backend.
pub fn test_app() -> App {
    App::new(Arc::new(ScriptedBackend::default()), "Test Bot".to_string())
}
