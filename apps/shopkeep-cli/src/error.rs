//! # CLI Error Type
//!
//! Everything that can stop the program before or during the menu loop.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Shopkeep                               │
//! │                                                                         │
//! │  ValidationError ──► CoreError ──► StoreError ──► CliError ──► exit 1 │
//! │                                                                         │
//! │  Inside the menu loop only terminal I/O failures reach this type;      │
//! │  rejected sale lines and bad input are printed and the loop goes on.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use shopkeep_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the `shopkeep` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is missing or inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The config file exists but couldn't be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file isn't valid TOML for [`ShopConfig`](crate::config::ShopConfig).
    #[error("Failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A backing file couldn't be loaded or rewritten.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The log file or filter couldn't be set up.
    #[error("Failed to set up logging: {0}")]
    Logging(String),

    /// Reading from or writing to the terminal failed.
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
