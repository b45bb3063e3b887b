//! Application configuration
//!
//! Loaded from an optional JSON file, then overridden by environment
//! variables and finally by command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::builder::DEFAULT_MAX_QUANTITY;

/// Environment variable overriding [`AppConfig::api_base`]
pub const ENV_API_BASE: &str = "GIGAHZ_API_BASE";
/// Environment variable overriding [`AppConfig::session_dir`]
pub const ENV_SESSION_DIR: &str = "GIGAHZ_SESSION_DIR";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the product API (also used to absolutize image paths)
    pub api_base: String,
    /// Request only active listings
    pub active_only: bool,
    /// Per-request timeout for catalog fetches
    pub request_timeout_secs: u64,
    /// Directory holding the session store and TUI log
    pub session_dir: PathBuf,
    /// Upper bound for a single line's quantity
    pub max_quantity: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:3000".to_string(),
            active_only: true,
            request_timeout_secs: 10,
            session_dir: std::env::temp_dir().join("gigahz-session"),
            max_quantity: DEFAULT_MAX_QUANTITY,
        }
    }
}

impl AppConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Apply `GIGAHZ_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base) = lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            self.api_base = base;
        }
        if let Some(dir) = lookup(ENV_SESSION_DIR).filter(|v| !v.trim().is_empty()) {
            self.session_dir = PathBuf::from(dir);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let base = self.api_base.trim();
        if base.is_empty() {
            anyhow::bail!("API base URL must be specified");
        }
        if !base.starts_with("http://") && !base.starts_with("https://") {
            anyhow::bail!("API base URL must start with http:// or https://");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("Request timeout must be at least 1 second");
        }
        if self.max_quantity == 0 {
            anyhow::bail!("Maximum quantity must be at least 1");
        }
        if self.session_dir.as_os_str().is_empty() {
            anyhow::bail!("Session directory must be specified");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_base() {
        let config = AppConfig {
            api_base: "localhost:3000".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default().with_overrides_from(|key| match key {
            ENV_API_BASE => Some("https://api.gigahz.lk".to_string()),
            ENV_SESSION_DIR => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.api_base, "https://api.gigahz.lk");
        assert_eq!(config.session_dir, AppConfig::default().session_dir);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gigahz.json");
        let config = AppConfig {
            request_timeout_secs: 3,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(AppConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{ "api_base": "https://shop.example" }"#).unwrap();
        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.api_base, "https://shop.example");
        assert_eq!(config.max_quantity, DEFAULT_MAX_QUANTITY);
    }
}
