//! Configuration management for counseld.
//!
//! Loads settings from `$COUNSELD_CONFIG`, /etc/counsel/config.toml or
//! /var/lib/counsel/config.toml, falling back to defaults. A few
//! environment variables override the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "COUNSELD_CONFIG";

/// Config file path
pub const CONFIG_PATH: &str = "/etc/counsel/config.toml";

/// Default config file path for fallback
pub const DEFAULT_CONFIG_PATH: &str = "/var/lib/counsel/config.toml";

/// Overrides `server.ping_message`
pub const PING_MESSAGE_ENV: &str = "PING_MESSAGE";

/// Overrides `server.bind_addr`
pub const BIND_ENV: &str = "COUNSELD_BIND";

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Directory holding the built front end (index.html)
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Body of `GET /api/ping`
    #[serde(default = "default_ping_message")]
    pub ping_message: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("dist/spa")
}

fn default_ping_message() -> String {
    "ping".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            request_timeout_secs: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
            static_dir: default_static_dir(),
            ping_message: default_ping_message(),
        }
    }
}

/// Stub auth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Seed the directory with the fixture account
    #[serde(default = "default_seed_fixture_user")]
    pub seed_fixture_user: bool,
}

fn default_seed_fixture_user() -> bool {
    true
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            seed_fixture_user: default_seed_fixture_user(),
        }
    }
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

impl Config {
    /// Load config from file (or defaults), then apply env overrides
    pub fn load() -> Self {
        let mut config = Self::load_file().unwrap_or_else(|e| {
            warn!("Config not found, using defaults: {}", e);
            Config::default()
        });
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn load_file() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from_path(&path);
        }
        Self::load_from_path(CONFIG_PATH).or_else(|_| Self::load_from_path(DEFAULT_CONFIG_PATH))
    }

    /// Load config from specific path
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(msg) = lookup(PING_MESSAGE_ENV) {
            self.server.ping_message = msg;
        }
        if let Some(addr) = lookup(BIND_ENV).filter(|a| !a.trim().is_empty()) {
            self.server.bind_addr = addr;
        }
    }

    /// Save default config to path (for init)
    pub fn save_default(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(&Config::default())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        info!("Saved default config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.server.ping_message, "ping");
        assert_eq!(config.server.max_body_bytes, 65536);
        assert!(config.auth.seed_fixture_user);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            bind_addr = "0.0.0.0:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.server.request_timeout_secs, 10);
        assert!(config.auth.seed_fixture_user);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> =
            [(PING_MESSAGE_ENV, "pong"), (BIND_ENV, "0.0.0.0:1")].into_iter().collect();
        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.server.ping_message, "pong");
        assert_eq!(config.server.bind_addr, "0.0.0.0:1");
    }

    #[test]
    fn test_blank_bind_env_ignored() {
        let mut config = Config::default();
        config.apply_env(|k| (k == BIND_ENV).then(|| " ".to_string()));
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Config::save_default(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.server.bind_addr, Config::default().server.bind_addr);
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(Config::load_from_path("/definitely/not/here.toml").is_err());
    }
}
