//! Backup restoration
//!
//! Turns a stored snapshot back into a set of live records. The store
//! applies the result as one replace-all unit.

use chrono::{DateTime, Utc};

use crate::models::{Backup, BackupId, Expense, ExpenseId};

/// Copy a snapshot's records, giving every one of them a fresh id
pub fn prepare_restore(backup: &Backup) -> Vec<Expense> {
    backup
        .data
        .iter()
        .cloned()
        .map(|mut expense| {
            expense.id = Some(ExpenseId::generate());
            expense
        })
        .collect()
}

/// Result of a restore operation
#[derive(Debug, Clone)]
pub struct RestoreResult {
    /// The backup that was restored
    pub source: BackupId,
    /// Its label
    pub label: String,
    /// When it was taken
    pub taken_at: DateTime<Utc>,
    /// Number of records now in the table
    pub restored_count: usize,
}

impl RestoreResult {
    pub(crate) fn from_backup(backup: &Backup, restored_count: usize) -> Self {
        Self {
            source: backup.id,
            label: backup.label.clone(),
            taken_at: backup.timestamp,
            restored_count,
        }
    }

    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        format!(
            "Restored {} expense(s) from backup {} ({})",
            self.restored_count, self.source, self.label
        )
    }
}
