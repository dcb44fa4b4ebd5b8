//! Configuration loading and management
//!
//! Handles parsing of `.taskdesk.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::model::CategoryPayload;
use crate::validate;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = ".taskdesk.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the collection files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Fallback category created at startup
    #[serde(default)]
    pub default_category: DefaultCategoryConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_category: DefaultCategoryConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Name and color of the always-present category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultCategoryConfig {
    #[serde(default = "default_category_name")]
    pub name: String,

    #[serde(default = "default_category_color")]
    pub color: String,
}

fn default_category_name() -> String {
    "Ostatní".to_string()
}

fn default_category_color() -> String {
    "#999999".to_string()
}

impl Default for DefaultCategoryConfig {
    fn default() -> Self {
        Self {
            name: default_category_name(),
            color: default_category_color(),
        }
    }
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// How long to wait for a collection lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    /// Pretty-print collection files
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
            pretty: true,
        }
    }
}

impl Config {
    /// Load configuration from a `.taskdesk.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Data directory resolved against `base` when relative
    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        if self.data_dir.is_absolute() {
            self.data_dir.clone()
        } else {
            base.join(&self.data_dir)
        }
    }

    fn validate(&self) -> crate::error::Result<()> {
        let payload =
            CategoryPayload::new(&self.default_category.name, &self.default_category.color);
        validate::validate_category(&payload).map_err(|err| {
            crate::error::Error::InvalidConfig(format!("default_category: {err}"))
        })?;

        if self.storage.lock_timeout_ms == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "storage.lock_timeout_ms must be > 0".to_string(),
            ));
        }

        if self.data_dir.as_os_str().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "data_dir cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
