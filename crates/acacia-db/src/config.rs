//! # Inventory Configuration
//!
//! Where the database lives and which timezone the business day runs in.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     ACACIA_DATABASE_PATH=/var/lib/acacia/inventory.db                   │
//! │     ACACIA_MAX_CONNECTIONS=8                                            │
//! │     ACACIA_TIMEZONE=Asia/Manila                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/acacia-inventory/inventory.toml (Linux)                   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     platform data dir, 5 connections, UTC                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # inventory.toml
//! [database]
//! path = "/var/lib/acacia/inventory.db"
//! max_connections = 5
//!
//! [operations]
//! timezone = "Asia/Manila"   # IANA name, the business day runs on local time
//! ```

use acacia_core::OperatingTimezone;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::pool::DbConfig;

pub const ENV_DATABASE_PATH: &str = "ACACIA_DATABASE_PATH";
pub const ENV_MAX_CONNECTIONS: &str = "ACACIA_MAX_CONNECTIONS";
pub const ENV_TIMEZONE: &str = "ACACIA_TIMEZONE";

const CONFIG_FILE_NAME: &str = "inventory.toml";
const DATABASE_FILE_NAME: &str = "inventory.db";

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No config path available on this platform")]
    NoConfigPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. `:memory:` selects a throwaway in-memory database.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("com", "acacia", "inventory")
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// `[operations]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationsSettings {
    /// IANA name of the operating timezone.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for OperationsSettings {
    fn default() -> Self {
        OperationsSettings {
            timezone: default_timezone(),
        }
    }
}

// =============================================================================
// Inventory Config
// =============================================================================

/// Complete configuration for an Acacia Inventory deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub operations: OperationsSettings,
}

impl InventoryConfig {
    /// Loads configuration from file (if present), then the environment.
    ///
    /// `config_path` falls back to the platform config directory.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading inventory config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load inventory config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Inventory config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        self.timezone()?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparsable values are skipped.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup(ENV_MAX_CONNECTIONS) {
            match max.trim().parse::<u32>() {
                Ok(max) => self.database.max_connections = max,
                Err(_) => warn!(value = %max, "Ignoring unparsable {}", ENV_MAX_CONNECTIONS),
            }
        }

        if let Some(timezone) = lookup(ENV_TIMEZONE) {
            debug!(timezone = %timezone, "Overriding operating timezone from environment");
            self.operations.timezone = timezone.trim().to_string();
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "acacia", "inventory")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Pool settings for [`Database::new`](crate::Database::new).
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database.path.clone()).max_connections(self.database.max_connections)
    }

    /// The timezone the business day is counted in.
    pub fn timezone(&self) -> ConfigResult<OperatingTimezone> {
        OperatingTimezone::from_name(&self.operations.timezone)
            .map_err(|e| ConfigError::Invalid(format!("operations.timezone: {e}")))
    }
}
