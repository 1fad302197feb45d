//! Custom error types for the expense tracker
//!
//! This module defines the error hierarchy for the library using thiserror.
//! The storage-facing variants mirror the failure classes callers need to
//! tell apart: the store could not be opened at all, a primary write did not
//! commit, or only the follow-up snapshot failed.

use thiserror::Error;

/// The main error type for expense tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// The store could not be opened (permissions, lock held, corrupt tables)
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A primary table write failed; the operation did not commit
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// The snapshot after a committed write failed
    #[error("Backup failed: {0}")]
    BackupFailed(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Malformed import input
    #[error("Parse error: {0}")]
    Parse(String),

    /// A single CSV row was rejected; decoding continues without it
    #[error("Skipped row {row}: {reason}")]
    ValidationSkip { row: usize, reason: String },

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Internal storage errors (poisoned locks and the like)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TrackerError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error only affected the backup log
    pub fn is_backup_failure(&self) -> bool {
        matches!(self, Self::BackupFailed(_))
    }

    /// Check if this is a parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for expense tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
