//! Client configuration.
//!
//! Resolution order: `GRIDBASE_API_BASE` environment variable, then
//! `~/.config/gridbase/config.toml`, then the built-in default.

use crate::paths::GridbasePaths;
use gridbase_core::{GridbaseError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at a specific base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Loads configuration from the default locations.
    ///
    /// Missing config file is not an error; a malformed one is.
    pub fn load() -> Result<Self> {
        let mut config = match GridbasePaths::config_file() {
            Ok(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        if let Ok(base) = env::var("GRIDBASE_API_BASE") {
            if !base.is_empty() {
                config.base_url = base;
            }
        }
        config.base_url = normalize_base_url(config.base_url);
        Ok(config)
    }

    /// Loads configuration from a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Joins a resource path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Validates the configuration before constructing a client.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(GridbaseError::config("base_url must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(GridbaseError::config("timeout_secs must be positive"));
        }
        Ok(())
    }
}

fn normalize_base_url(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_url_join() {
        let config = ClientConfig::with_base_url("http://example.com/api/");
        assert_eq!(
            config.url("/tables/7/records"),
            "http://example.com/api/tables/7/records"
        );
        assert_eq!(config.url("workspaces"), "http://example.com/api/workspaces");
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = \"https://db.example.com/api\"\n").unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.base_url, "https://db.example.com/api");
        // Omitted keys fall back to defaults
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_from_malformed_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = [not toml").unwrap();

        assert!(ClientConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let config = ClientConfig {
            base_url: String::new(),
            timeout_secs: 30,
        };
        assert!(config.validate().is_err());
    }
}
