//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CART_INVENTORY_URL=http://localhost:3333                           │
//! │     CART_DB_PATH=/tmp/cart.db                                          │
//! │     CART_STORAGE_KEY=@RocketShoes:cart                                 │
//! │     CART_HTTP_TIMEOUT_SECS=5                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/cart/cart.toml (Linux)                                   │
//! │     ~/Library/Application Support/com.rocketshoes.cart/cart.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [inventory]
//! base_url = "http://localhost:3333"
//! timeout_secs = 5
//!
//! [storage]
//! database_path = "/var/lib/cart/cart.db"
//! key = "@RocketShoes:cart"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use cart_core::DEFAULT_STORAGE_KEY;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

// =============================================================================
// Inventory Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Root URL of the inventory REST service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl InventorySettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. Defaults to `cart.db` in the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Namespace key of the cart snapshot.
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: None,
            key: default_key(),
        }
    }
}

// =============================================================================
// CLI Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub inventory: InventorySettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl CliConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform default)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else if explicit {
                return Err(CliError::InvalidConfig(format!(
                    "config file not found: {}",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(contents: &str) -> CliResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CART_INVENTORY_URL") {
            debug!(url = %url, "Overriding inventory URL from environment");
            self.inventory.base_url = url;
        }

        if let Some(path) = lookup("CART_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("CART_STORAGE_KEY") {
            self.storage.key = key;
        }

        if let Some(secs) = lookup("CART_HTTP_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => self.inventory.timeout_secs = Some(secs),
                Err(_) => warn!(value = %secs, "Ignoring non-numeric CART_HTTP_TIMEOUT_SECS"),
            }
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.storage.key.trim().is_empty() {
            return Err(CliError::InvalidConfig("storage key must not be empty".into()));
        }

        let url = &self.inventory.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CliError::InvalidConfig(format!(
                "inventory base_url must start with http:// or https://, got: {url}"
            )));
        }

        if self.inventory.timeout_secs == Some(0) {
            return Err(CliError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Resolved database file, creating the default data directory if needed.
    pub fn database_path(&self) -> CliResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(CliError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("cart.db"))
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("cart.toml"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "rocketshoes", "cart")
}
