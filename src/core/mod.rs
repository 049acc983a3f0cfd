//! # Core Application Logic
//!
//! This module contains Parley's chat logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │  Backend   │
//!             │  Adapter   │          │  (reqwest) │
//!             │ (ratatui)  │          │            │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all chat state in one place
//! - [`action`]: The `Action` enum and `update()`
//! - [`transcript`]: Append-only message history with the typing indicator
//! - [`message`]: A single message and its timestamp
//! - [`markup`]: Escaping, tokenizing and sanitizing message markup
//! - [`config`]: Layered configuration

pub mod action;
pub mod config;
pub mod markup;
pub mod message;
pub mod state;
pub mod transcript;
