//! Configuration management for the Connectly client.
//!
//! Loads configuration from ${CONNECTLY_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default Connectly server base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default request timeout for server calls, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Server connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the Connectly server.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Returns the request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Config {
    /// Loads the configuration from the default path.
    ///
    /// A missing file yields the defaults; a present but unparsable file is
    /// an error rather than a silent fallback.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads the configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read config from {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parse config at {}", path.display()))
    }

    /// Writes a default config file at `path` unless one already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("config already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        let toml = toml::to_string_pretty(&Self::default()).context("serialize default config")?;
        fs::write(path, toml).with_context(|| format!("write config to {}", path.display()))?;
        Ok(())
    }

    /// Resolves the server base URL: env override, then config, then default.
    pub fn base_url(&self) -> String {
        if let Ok(url) = std::env::var("CONNECTLY_BASE_URL") {
            let trimmed = url.trim().trim_end_matches('/');
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
        self.server.base_url.trim_end_matches('/').to_string()
    }
}

pub mod paths {
    //! Path resolution for Connectly configuration and data files.
    //!
    //! CONNECTLY_HOME resolution order:
    //! 1. CONNECTLY_HOME environment variable (if set)
    //! 2. ~/.config/connectly (default)

    use std::path::PathBuf;

    /// Returns the Connectly home directory.
    pub fn connectly_home() -> PathBuf {
        if let Ok(home) = std::env::var("CONNECTLY_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("connectly"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        connectly_home().join("config.toml")
    }

    /// Returns the path to the persisted session token.
    pub fn session_path() -> PathBuf {
        connectly_home().join("session.json")
    }

    /// Returns the path to the locally persisted feed.
    pub fn feed_path() -> PathBuf {
        connectly_home().join("feed.json")
    }

    /// Returns the path to the locally persisted profile.
    pub fn profile_path() -> PathBuf {
        connectly_home().join("profile.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.server.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config =
            toml::from_str("[server]\nbase_url = \"https://connectly.example\"\n").unwrap();
        assert_eq!(config.server.base_url, "https://connectly.example");
        assert_eq!(config.server.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn default_config_roundtrips() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.server.base_url, Config::default().server.base_url);
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        Config::init(&path).unwrap();
        assert!(path.exists());
        assert!(Config::init(&path).is_err());
    }

    #[test]
    fn load_from_missing_file_is_default() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp.path().join("nope.toml")).unwrap();
        assert_eq!(config.server.base_url, DEFAULT_BASE_URL);
    }
}
