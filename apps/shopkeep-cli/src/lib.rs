//! # Shopkeep Terminal Library
//!
//! Wires configuration, logging and the [`Shop`] controller to the menu.
//!
//! ## Module Organization
//! ```text
//! shopkeep_cli/
//! ├── lib.rs          ◄─── You are here (startup & logging)
//! ├── main.rs         ◄─── Binary entry point, exit code
//! ├── config.rs       ◄─── ShopConfig (TOML, env, flags)
//! ├── menu.rs         ◄─── Menu loop and actions
//! ├── prompt.rs       ◄─── Re-prompting input parsers
//! ├── table.rs        ◄─── Grid tables
//! └── error.rs        ◄─── CliError
//! ```

pub mod config;
pub mod error;
pub mod menu;
pub mod prompt;
pub mod table;

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{LogSettings, ShopConfig};
use error::{CliError, CliResult};
use menu::Menu;
use shopkeep_core::AuditLog;
use shopkeep_store::{Shop, TracingAudit};

/// Command-line flags.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "shopkeep", version, about = "Inventory and sales tracker for a small shop")]
pub struct Cli {
    /// Config file (default: per-user config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Inventory CSV file
    #[arg(long, value_name = "PATH")]
    pub inventory: Option<PathBuf>,

    /// Sales CSV file
    #[arg(long, value_name = "PATH")]
    pub sales: Option<PathBuf>,

    /// Audit log file (appended to)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Resolves the full configuration: defaults, file, environment, flags.
    pub fn resolve_config(&self) -> CliResult<ShopConfig> {
        let mut config = ShopConfig::load(self.config.as_deref())?;
        config.apply_overrides(
            self.inventory.clone(),
            self.sales.clone(),
            self.log_file.clone(),
        );
        config.validate()?;
        Ok(config)
    }
}

/// Runs the terminal application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Resolve Configuration ────────────────────────────────────────────► │
/// │     • defaults → shopkeep.toml → SHOPKEEP_* env → flags                 │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber writing to the log file                        │
/// │     • Level from config, can be overridden with RUST_LOG                │
/// │                                                                         │
/// │  3. Open the Shop ────────────────────────────────────────────────────► │
/// │     • load inventory.csv and sales.csv (missing → empty)                │
/// │                                                                         │
/// │  4. Menu loop on stdin/stdout until Exit                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run(cli: Cli) -> CliResult<()> {
    let config = cli.resolve_config()?;

    init_tracing(&config.log)?;

    info!(
        inventory = %config.files.inventory.display(),
        sales = %config.files.sales.display(),
        "Starting Shopkeep"
    );

    let audit: Arc<dyn AuditLog> = Arc::new(TracingAudit);
    let shop = Shop::open(&config.shop_paths(), audit.clone())?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(shop, stdin.lock(), stdout.lock(), audit);
    menu.run()
}

/// Sends `tracing` output to the configured log file.
///
/// `RUST_LOG`, when set, replaces the configured level.
pub fn init_tracing(log: &LogSettings) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .map_err(|e| CliError::Logging(format!("invalid log level '{}': {}", log.level, e)))?;

    if let Some(parent) = log.file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| CliError::Logging(format!("{}: {}", parent.display(), e)))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log.file)
        .map_err(|e| CliError::Logging(format!("{}: {}", log.file.display(), e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "shopkeep",
            "--inventory",
            "stock.csv",
            "--sales",
            "ledger.csv",
            "--log-file",
            "audit.log",
        ]);

        assert_eq!(cli.inventory, Some(PathBuf::from("stock.csv")));
        assert_eq!(cli.sales, Some(PathBuf::from("ledger.csv")));
        assert_eq!(cli.log_file, Some(PathBuf::from("audit.log")));
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("shopkeep.toml");
        std::fs::write(&config_path, "[files]\ninventory = \"a.csv\"\nsales = \"b.csv\"\n").unwrap();

        let cli = Cli {
            config: Some(config_path),
            sales: Some(PathBuf::from("c.csv")),
            ..Cli::default()
        };
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.files.sales, PathBuf::from("c.csv"));
    }

    #[test]
    fn test_same_file_for_both_is_rejected() {
        let cli = Cli {
            config: None,
            inventory: Some(PathBuf::from("shop.csv")),
            sales: Some(PathBuf::from("shop.csv")),
            log_file: None,
        };
        assert!(matches!(cli.resolve_config(), Err(CliError::Config(_))));
    }
}
