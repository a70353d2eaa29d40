//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.roomchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::scroll::DEFAULT_JUMP_THRESHOLD;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RoomchatConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub socket_url: Option<String>,
    pub token: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub jump_threshold: Option<u32>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api";
pub const DEFAULT_SOCKET_URL: &str = "ws://localhost:4000/ws";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub socket_url: String,
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub jump_threshold: u32,
}

/// Values given on the command line (None = flag not passed).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub server: Option<String>,
    pub socket: Option<String>,
    pub token: Option<String>,
    pub user: Option<String>,
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

/// Returns the path to `~/.roomchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".roomchat").join("config.toml"))
}

/// Load config from `~/.roomchat/config.toml` (or `path_override`).
///
/// If the default file doesn't exist, generates a commented-out default and
/// returns `RoomchatConfig::default()`. An explicit override that doesn't
/// exist is an I/O error. A malformed file returns `ConfigError::Parse`.
pub fn load_config(path_override: Option<&Path>) -> Result<RoomchatConfig, ConfigError> {
    if let Some(path) = path_override {
        return read_config(path);
    }

    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(RoomchatConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(RoomchatConfig::default());
    }

    read_config(&path)
}

fn read_config(path: &Path) -> Result<RoomchatConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RoomchatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    // Token deliberately left out of the log.
    debug!(
        "Config: base_url={:?} socket_url={:?} user_id={:?} ui={:?}",
        config.server.base_url, config.server.socket_url, config.server.user_id, config.ui
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# roomchat configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [server]
# base_url = "http://localhost:4000/api"   # Or ROOMCHAT_BASE_URL
# socket_url = "ws://localhost:4000/ws"    # Or ROOMCHAT_SOCKET_URL
# token = "eyJ..."                         # Or ROOMCHAT_TOKEN
# user_id = "64f1c0ffee"                   # Or ROOMCHAT_USER_ID (enables editing own messages)

# [ui]
# jump_threshold = 2000                    # Rows scrolled back before "jump to latest" shows
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &RoomchatConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &RoomchatConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .server
        .clone()
        .or_else(|| env("ROOMCHAT_BASE_URL"))
        .or_else(|| config.server.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Socket URL: CLI → env → config → default
    let socket_url = cli
        .socket
        .clone()
        .or_else(|| env("ROOMCHAT_SOCKET_URL"))
        .or_else(|| config.server.socket_url.clone())
        .unwrap_or_else(|| DEFAULT_SOCKET_URL.to_string());

    // Token: CLI → env → config (no default)
    let token = cli
        .token
        .clone()
        .or_else(|| env("ROOMCHAT_TOKEN"))
        .or_else(|| config.server.token.clone());

    let user_id = cli
        .user
        .clone()
        .or_else(|| env("ROOMCHAT_USER_ID"))
        .or_else(|| config.server.user_id.clone());

    ResolvedConfig {
        base_url,
        socket_url,
        token,
        user_id,
        jump_threshold: config.ui.jump_threshold.unwrap_or(DEFAULT_JUMP_THRESHOLD),
    }
}
