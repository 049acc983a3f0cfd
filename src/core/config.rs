//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → server profile → config file → env vars → CLI flags.
//!
//! Config lives at `~/.parley/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! The server profile (`GET /config`) only fills values nobody set locally.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::backend::ServerProfile;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    pub bot_name: Option<String>,
    pub greeting: Option<String>,
    pub sanitize_bot_html: Option<bool>,
}

/// Values given on the command line (None/false = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub sanitize_bot_html: bool,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_BOT_NAME: &str = "AI Assistant";

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub bot_name: String,
    /// Opening bot message, if any.
    pub greeting: Option<String>,
    pub sanitize_bot_html: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.parley/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".parley").join("config.toml"))
}

/// Load config from `~/.parley/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ParleyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ParleyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ParleyConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ParleyConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: ParleyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Parley Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → server /config → this file → env vars → CLI flags.

# [backend]
# base_url = "http://localhost:5000"   # Or set PARLEY_BASE_URL, or pass --url

# [chat]
# bot_name = "AI Assistant"            # Or set BOT_NAME
# greeting = "Hi! How can I help?"     # Or set GREETING_MESSAGE
# sanitize_bot_html = false            # Strip untrusted markup from replies (--sanitize)
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Base URL only: CLI → env → config → default. Needed before the server
/// profile can be fetched.
pub fn resolve_base_url(config: &ParleyConfig, cli: &CliOverrides) -> String {
    resolve_base_url_with(config, cli, &|key| std::env::var(key).ok())
}

fn resolve_base_url_with(
    config: &ParleyConfig,
    cli: &CliOverrides,
    env: &dyn Fn(&str) -> Option<String>,
) -> String {
    cli.base_url
        .clone()
        .or_else(|| env("PARLEY_BASE_URL"))
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Resolve the final config from every layer, reading the process environment.
pub fn resolve(
    config: &ParleyConfig,
    cli: &CliOverrides,
    profile: Option<&ServerProfile>,
) -> ResolvedConfig {
    resolve_with(config, cli, profile, &|key| std::env::var(key).ok())
}

/// Resolve with an explicit environment lookup.
pub fn resolve_with(
    config: &ParleyConfig,
    cli: &CliOverrides,
    profile: Option<&ServerProfile>,
    env: &dyn Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let non_empty = |s: String| (!s.trim().is_empty()).then_some(s);

    // Bot name: env → config → server profile → default
    let bot_name = env("BOT_NAME")
        .and_then(non_empty)
        .or_else(|| config.chat.bot_name.clone().and_then(non_empty))
        .or_else(|| profile.and_then(|p| p.bot_name.clone()).and_then(non_empty))
        .unwrap_or_else(|| DEFAULT_BOT_NAME.to_string());

    // Greeting: env → config → server profile → none
    let greeting = env("GREETING_MESSAGE")
        .and_then(non_empty)
        .or_else(|| config.chat.greeting.clone().and_then(non_empty))
        .or_else(|| {
            profile
                .and_then(|p| p.greeting_message.clone())
                .and_then(non_empty)
        });

    ResolvedConfig {
        base_url: resolve_base_url_with(config, cli, env),
        bot_name,
        greeting,
        sanitize_bot_html: cli.sanitize_bot_html
            || config.chat.sanitize_bot_html.unwrap_or(false),
    }
}
