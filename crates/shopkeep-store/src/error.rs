//! # Store Error Types
//!
//! Error types for file-backed store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / csv::Error      CoreError / ValidationError               │
//! │       │                             │                                   │
//! │       ▼                             ▼                                   │
//! │  StoreError (this module) ← adds the file path and line number         │
//! │       │                                                                 │
//! │       ├── recoverable   → menu prints a message, loop continues        │
//! │       └── unrecoverable → CliError at startup, or abort of the batch   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing backing file is NOT an error: `load()` reports it through
//! [`LoadStatus::NotFound`](crate::LoadStatus::NotFound).

use std::path::{Path, PathBuf};

use shopkeep_core::{CoreError, ValidationError};
use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing or renaming a backing file failed.
    ///
    /// ## When This Occurs
    /// - Directory is not writable
    /// - Disk full
    /// - Permission denied on an existing file
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV writer failed while rewriting a backing file.
    #[error("Failed to write {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A backing file has content that doesn't fit the schema.
    ///
    /// ## When This Occurs
    /// - Missing column (`quantity` header absent)
    /// - Unparseable value (`abc` in the `id` column)
    /// - Row violating an invariant (negative stock)
    ///
    /// The whole load fails; nothing from the file is kept.
    #[error("Malformed {}{}: {reason}", path.display(), line_suffix(*line))]
    Malformed {
        path: PathBuf,
        line: Option<u64>,
        reason: String,
    },

    /// A sale line was rejected by a business rule.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A record failed validation before it was stored.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn line_suffix(line: Option<u64>) -> String {
    line.map(|l| format!(" (line {})", l)).unwrap_or_default()
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed(path: &Path, line: Option<u64>, reason: impl Into<String>) -> Self {
        StoreError::Malformed {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    /// True for errors the operator can act on and retry: rejected sale
    /// lines and invalid records. File problems are not recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StoreError::Core(_) | StoreError::Validation(_))
    }

    /// Splits a recoverable error out as a [`CoreError`], handing anything
    /// else back unchanged.
    pub fn into_rejection(self) -> Result<CoreError, StoreError> {
        match self {
            StoreError::Core(err) => Ok(err),
            StoreError::Validation(err) => Ok(CoreError::Validation(err)),
            other => Err(other),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_includes_line() {
        let err = StoreError::malformed(Path::new("inventory.csv"), Some(3), "invalid digit");
        assert_eq!(err.to_string(), "Malformed inventory.csv (line 3): invalid digit");

        let err = StoreError::malformed(Path::new("sales.csv"), None, "bad header");
        assert_eq!(err.to_string(), "Malformed sales.csv: bad header");
    }

    #[test]
    fn test_recoverability() {
        let rejected: StoreError = CoreError::UnknownProduct(9).into();
        assert!(rejected.is_recoverable());
        assert_eq!(rejected.into_rejection().unwrap(), CoreError::UnknownProduct(9));

        let io = StoreError::io(
            Path::new("inventory.csv"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!io.is_recoverable());
        assert!(io.into_rejection().is_err());
    }
}
