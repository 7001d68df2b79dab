//! Configuration
//!
//! A single JSON file. Every field has a default, so a partial file (or
//! `{}`) is valid. A missing file means all defaults; a file that exists
//! but does not parse is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Severity};
use crate::storage::CorruptSnapshotPolicy;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File exists but could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// File is not valid config JSON
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Parsed, but a value is out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Name reported by the `hello` operation (default: "catalogdb")
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Minimum log severity: trace, info, warn, error or fatal (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub features: FeaturesConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

/// Snapshot file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Snapshot file path (default: "./data/catalogdb.json")
    #[serde(default = "default_storage_path")]
    pub path: String,

    /// What to do with an unparseable snapshot (default: fail)
    #[serde(default)]
    pub on_corrupt: CorruptSnapshotPolicy,
}

/// Optional features, all enabled by default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_true")]
    pub analytics: bool,

    #[serde(default = "default_true")]
    pub audit: bool,
}

/// Account seeded on first start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_username", alias = "default_username")]
    pub username: String,

    #[serde(default = "default_admin_password", alias = "default_password")]
    pub password: String,

    #[serde(default = "default_admin_email", alias = "default_email")]
    pub email: String,
}

fn default_app_name() -> String {
    "catalogdb".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_storage_path() -> String {
    "./data/catalogdb.json".to_string()
}
fn default_true() -> bool {
    true
}
fn default_admin_username() -> String {
    "admin".to_string()
}
fn default_admin_password() -> String {
    "adminpass".to_string()
}
fn default_admin_email() -> String {
    "admin@example.com".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            log_level: default_log_level(),
            storage: StorageConfig::default(),
            features: FeaturesConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            on_corrupt: CorruptSnapshotPolicy::default(),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            analytics: true,
            audit: true,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password: default_admin_password(),
            email: default_admin_email(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if it is absent
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log_event_with_fields(
                    Event::ConfigDefaulted,
                    &[("path", path.display().to_string().as_str())],
                );
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        let config = Self::from_json(&content)?;
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", path.display().to_string().as_str())],
        );
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate value ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage.path.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.path must not be empty".to_string(),
            ));
        }

        self.log_severity()?;
        Ok(())
    }

    /// The configured minimum log severity
    pub fn log_severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(|_| {
            ConfigError::Invalid(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            ))
        })
    }

    /// Snapshot file path
    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.path)
    }

    /// Pretty JSON rendering, as written by `init`
    pub fn to_pretty_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
