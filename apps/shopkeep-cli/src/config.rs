//! # Shop Configuration
//!
//! Where the backing files and the log live, and how verbose the log is.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --inventory, --sales, --log-file                                   │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     SHOPKEEP_INVENTORY_FILE=/srv/shop/inventory.csv                    │
//! │     SHOPKEEP_LOG_LEVEL=debug                                           │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <PATH>, or                                                │
//! │     ~/.config/shopkeep/shopkeep.toml (Linux)                           │
//! │     ~/Library/Application Support/com.shopkeep.shopkeep/shopkeep.toml  │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     inventory.csv, sales.csv, shop_system.log in the working directory │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # shopkeep.toml
//! [files]
//! inventory = "inventory.csv"
//! sales = "sales.csv"
//!
//! [log]
//! file = "shop_system.log"
//! level = "info"   # any tracing EnvFilter directive, e.g. "info,shopkeep_store=debug"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};
use shopkeep_store::ShopPaths;

// =============================================================================
// Sections
// =============================================================================

/// `[files]`: the two backing files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default = "default_inventory")]
    pub inventory: PathBuf,

    #[serde(default = "default_sales")]
    pub sales: PathBuf,
}

fn default_inventory() -> PathBuf {
    PathBuf::from("inventory.csv")
}

fn default_sales() -> PathBuf {
    PathBuf::from("sales.csv")
}

impl Default for FileSettings {
    fn default() -> Self {
        FileSettings {
            inventory: default_inventory(),
            sales: default_sales(),
        }
    }
}

/// `[log]`: audit log destination and filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Appended to, never truncated.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// `tracing` filter directive. `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("shop_system.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

// =============================================================================
// Shop Config
// =============================================================================

/// Complete configuration for the `shopkeep` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default)]
    pub files: FileSettings,

    #[serde(default)]
    pub log: LogSettings,
}

impl ShopConfig {
    /// Loads configuration from file and environment on top of defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file: `config_path` if given (must exist), else the
    ///    per-user default location (skipped if absent)
    /// 3. Environment variables
    ///
    /// Flags are applied afterwards with [`ShopConfig::apply_overrides`].
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) if !path.exists() => {
                return Err(CliError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parses one TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        let paths = [
            ("files.inventory", &self.files.inventory),
            ("files.sales", &self.files.sales),
            ("log.file", &self.log.file),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(CliError::Config(format!("{} must not be empty", key)));
            }
        }

        if self.files.inventory == self.files.sales {
            return Err(CliError::Config(format!(
                "inventory and sales must be different files (both are {})",
                self.files.inventory.display()
            )));
        }

        if self.log.level.trim().is_empty() {
            return Err(CliError::Config("log.level must not be empty".into()));
        }

        Ok(())
    }

    /// Applies command-line flags. `None` leaves the current value.
    pub fn apply_overrides(
        &mut self,
        inventory: Option<PathBuf>,
        sales: Option<PathBuf>,
        log_file: Option<PathBuf>,
    ) {
        if let Some(path) = inventory {
            self.files.inventory = path;
        }
        if let Some(path) = sales {
            self.files.sales = path;
        }
        if let Some(path) = log_file {
            self.log.file = path;
        }
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("SHOPKEEP_INVENTORY_FILE") {
            debug!(path = %path, "Overriding inventory file from environment");
            self.files.inventory = PathBuf::from(path);
        }

        if let Some(path) = var("SHOPKEEP_SALES_FILE") {
            debug!(path = %path, "Overriding sales file from environment");
            self.files.sales = PathBuf::from(path);
        }

        if let Some(path) = var("SHOPKEEP_LOG_FILE") {
            self.log.file = PathBuf::from(path);
        }

        if let Some(level) = var("SHOPKEEP_LOG_LEVEL") {
            self.log.level = level;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "shopkeep", "shopkeep")
            .map(|dirs| dirs.config_dir().join("shopkeep.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Backing file locations for [`Shop::open`](shopkeep_store::Shop::open).
    pub fn shop_paths(&self) -> ShopPaths {
        ShopPaths::new(&self.files.inventory, &self.files.sales)
    }
}
