//! Configuration file management.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the story backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token from the last login; absent means anonymous mode
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Treat the device as offline (submissions go straight to the
    /// pending queue)
    #[serde(default)]
    pub offline: bool,
}

fn default_base_url() -> String {
    "https://story-api.dicoding.dev/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
            offline: false,
        }
    }
}

impl Config {
    /// Path of the configuration file, following platform conventions.
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tale")
            .join("config.toml")
    }

    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Persist the configuration.
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://story-api.dicoding.dev/v1");
        assert_eq!(config.timeout_secs, 15);
        assert!(config.token.is_none());
        assert!(!config.offline);
    }

    #[test]
    fn test_partial_config_parses_with_defaults() {
        let config: Config = toml::from_str("token = \"jwt\"\n").unwrap();
        assert_eq!(config.token.as_deref(), Some("jwt"));
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.token = Some("jwt-token".to_string());
        config.offline = true;

        let toml = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&toml).unwrap();
        assert_eq!(back.token.as_deref(), Some("jwt-token"));
        assert!(back.offline);
    }
}
