//! Application configuration.
//!
//! Configuration is stored in `<config dir>/config.yaml` and includes:
//! - The origin of the repair management backend
//! - The per-request timeout
//! - How long notifications stay on screen
//!
//! Every value can be overridden from the environment, which always wins over
//! the file.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BachesError, Result};

pub const ENV_BASE_URL: &str = "BACHES_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "BACHES_TIMEOUT_MS";
pub const ENV_CONFIG_DIR: &str = "BACHES_CONFIG_DIR";
pub const ENV_DATA_DIR: &str = "BACHES_DATA_DIR";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_NOTIFICATION_MS: u64 = 4000;

/// Keys accepted by `config get` / `config set`
pub const CONFIG_KEYS: [&str; 3] = ["base_url", "timeout_ms", "notification_ms"];

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Origin every API path is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds (default: 3000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Notification lifetime in milliseconds (default: 4000)
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_notification_ms() -> u64 {
    DEFAULT_NOTIFICATION_MS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            notification_ms: default_notification_ms(),
        }
    }
}

/// Returns the configuration directory.
///
/// Resolution order:
/// 1. `BACHES_CONFIG_DIR` environment variable (if set)
/// 2. The platform config directory for `baches`
/// 3. `.baches` in the current directory
pub fn config_dir() -> PathBuf {
    if let Some(dir) = env_non_empty(ENV_CONFIG_DIR) {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("", "", "baches")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".baches"))
}

/// Returns the data directory (token storage, log file).
///
/// Same resolution order as [`config_dir`], using `BACHES_DATA_DIR`.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = env_non_empty(ENV_DATA_DIR) {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("", "", "baches")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".baches"))
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        config_dir().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Load the file and apply environment overrides.
    ///
    /// This is what every command runs with.
    pub fn effective() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(url) = env_non_empty(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(raw) = env_non_empty(ENV_TIMEOUT_MS) {
            self.timeout_ms = parse_millis(ENV_TIMEOUT_MS, &raw)?;
        }
        Ok(())
    }

    /// Reject values the client cannot run with
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.timeout_ms == 0 {
            return Err(BachesError::Config(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The parsed backend origin
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            BachesError::Config(format!("invalid base_url '{}': {e}", self.base_url))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(BachesError::Config(format!(
                "invalid base_url '{}': unsupported scheme '{other}'",
                self.base_url
            ))),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn notification_lifetime(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    /// Read a single value by key
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "base_url" => Ok(self.base_url.clone()),
            "timeout_ms" => Ok(self.timeout_ms.to_string()),
            "notification_ms" => Ok(self.notification_ms.to_string()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a single value by key, validating it first
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => {
                let mut candidate = self.clone();
                candidate.base_url = value.trim().to_string();
                candidate.base_url()?;
                self.base_url = candidate.base_url;
            }
            "timeout_ms" => {
                let millis = parse_millis(key, value)?;
                if millis == 0 {
                    return Err(BachesError::Config(
                        "timeout_ms must be greater than zero".to_string(),
                    ));
                }
                self.timeout_ms = millis;
            }
            "notification_ms" => self.notification_ms = parse_millis(key, value)?,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn parse_millis(key: &str, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        BachesError::Config(format!(
            "invalid value '{raw}' for {key}. Expected a number of milliseconds"
        ))
    })
}

fn unknown_key(key: &str) -> BachesError {
    BachesError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout(), Duration::from_millis(3000));
        assert_eq!(config.notification_lifetime(), Duration::from_millis(4000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml_ng::from_str("timeout_ms: 500\n").unwrap();
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.notification_ms, DEFAULT_NOTIFICATION_MS);
    }

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();
        config.set("base_url", "https://baches.example.org").unwrap();
        config.set("timeout_ms", "1500").unwrap();
        assert_eq!(config.get("base_url").unwrap(), "https://baches.example.org");
        assert_eq!(config.get("timeout_ms").unwrap(), "1500");

        assert!(config.set("timeout_ms", "soon").is_err());
        assert!(config.set("timeout_ms", "0").is_err());
        assert!(config.set("base_url", "ftp://example.org").is_err());
        assert!(config.set("token", "abc").is_err());
        assert_eq!(config.get("base_url").unwrap(), "https://baches.example.org");
    }

    #[test]
    #[serial]
    fn test_save_and_load_roundtrip_in_config_dir() {
        let dir = TempDir::new().unwrap();
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::set_var(ENV_CONFIG_DIR, dir.path()) };

        assert_eq!(Config::load().unwrap(), Config::default());

        let mut config = Config::default();
        config.set("notification_ms", "2500").unwrap();
        config.save().unwrap();
        assert!(dir.path().join("config.yaml").exists());
        assert_eq!(Config::load().unwrap().notification_ms, 2500);

        unsafe { std::env::remove_var(ENV_CONFIG_DIR) };
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe {
            std::env::set_var(ENV_CONFIG_DIR, dir.path());
            std::env::set_var(ENV_BASE_URL, "http://127.0.0.1:9999");
            std::env::set_var(ENV_TIMEOUT_MS, "250");
        }

        let config = Config::effective().unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.timeout_ms, 250);

        unsafe { std::env::set_var(ENV_TIMEOUT_MS, "later") };
        assert!(Config::effective().is_err());

        unsafe {
            std::env::remove_var(ENV_CONFIG_DIR);
            std::env::remove_var(ENV_BASE_URL);
            std::env::remove_var(ENV_TIMEOUT_MS);
        }
    }
}
