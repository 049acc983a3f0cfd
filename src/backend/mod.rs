//! # Backend
//!
//! Everything that talks to the chat server. The TUI only sees the
//! [`ChatBackend`] trait, so tests can swap in a scripted fake and the
//! request task stays independent of `reqwest`.

pub mod client;
pub mod http;
pub mod types;

pub use client::{BackendError, ChatBackend};
pub use http::HttpBackend;
pub use types::{ChatReply, ChatRequest, HealthStatus, ServerProfile};
