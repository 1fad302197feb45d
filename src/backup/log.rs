//! The backup log table
//!
//! Persisted as `backups.json`. The id counter lives next to the entries so
//! ids keep increasing even after the newest backups have been deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Backup, BackupId, BackupKind, Expense};

/// Current schema version of `backups.json`
pub const BACKUP_LOG_SCHEMA_VERSION: u32 = 1;

/// Ordered collection of backup entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupLog {
    #[serde(default = "default_schema_version")]
    schema_version: u32,
    /// Next id to hand out
    #[serde(default = "first_id")]
    next_id: u64,
    #[serde(default)]
    backups: Vec<Backup>,
}

fn default_schema_version() -> u32 {
    BACKUP_LOG_SCHEMA_VERSION
}

fn first_id() -> u64 {
    1
}

impl Default for BackupLog {
    fn default() -> Self {
        Self {
            schema_version: BACKUP_LOG_SCHEMA_VERSION,
            next_id: first_id(),
            backups: Vec::new(),
        }
    }
}

impl BackupLog {
    /// Append a snapshot and return its id
    pub fn append(
        &mut self,
        timestamp: DateTime<Utc>,
        kind: BackupKind,
        label: Option<String>,
        data: Vec<Expense>,
    ) -> BackupId {
        // Guard against hand-edited files whose counter lags behind
        let max_existing = self.backups.iter().map(|b| b.id.value()).max().unwrap_or(0);
        let id = BackupId::new(self.next_id.max(max_existing + 1));
        self.next_id = id.value() + 1;

        self.backups.push(Backup::new(id, timestamp, kind, label, data));
        id
    }

    /// Remove a backup, returning whether it existed
    pub fn remove(&mut self, id: BackupId) -> bool {
        let before = self.backups.len();
        self.backups.retain(|b| b.id != id);
        self.backups.len() != before
    }

    /// Drop every entry; the id counter is kept
    pub fn clear(&mut self) {
        self.backups.clear();
    }

    pub fn get(&self, id: BackupId) -> Option<&Backup> {
        self.backups.iter().find(|b| b.id == id)
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[Backup] {
        &self.backups
    }

    /// Entries sorted newest first
    pub fn newest_first(&self) -> Vec<Backup> {
        let mut backups = self.backups.clone();
        backups.sort_by(|a, b| b.recency_key().cmp(&a.recency_key()));
        backups
    }

    pub fn len(&self) -> usize {
        self.backups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_ids_increase_and_are_not_reused() {
        let mut log = BackupLog::default();
        let a = log.append(Utc::now(), BackupKind::Auto, None, Vec::new());
        let b = log.append(Utc::now(), BackupKind::Auto, None, Vec::new());
        assert_eq!(a, BackupId::new(1));
        assert_eq!(b, BackupId::new(2));

        assert!(log.remove(b));
        let c = log.append(Utc::now(), BackupKind::Manual, None, Vec::new());
        assert_eq!(c, BackupId::new(3));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut log = BackupLog::default();
        log.append(Utc::now(), BackupKind::Auto, None, Vec::new());
        assert!(!log.remove(BackupId::new(99)));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_append_records_count() {
        let mut log = BackupLog::default();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let data = vec![
            Expense::new(Money::from_cents(100), "Food", date),
            Expense::new(Money::from_cents(200), "Food", date),
        ];
        let id = log.append(Utc::now(), BackupKind::Auto, Some("two".into()), data);

        let backup = log.get(id).unwrap();
        assert_eq!(backup.count, 2);
        assert_eq!(backup.label, "two");
    }

    #[test]
    fn test_counter_survives_serialization() {
        let mut log = BackupLog::default();
        log.append(Utc::now(), BackupKind::Auto, None, Vec::new());
        let id = log.append(Utc::now(), BackupKind::Auto, None, Vec::new());
        log.remove(id);

        let json = serde_json::to_string(&log).unwrap();
        let mut restored: BackupLog = serde_json::from_str(&json).unwrap();
        let next = restored.append(Utc::now(), BackupKind::Auto, None, Vec::new());
        assert_eq!(next, BackupId::new(3));
    }
}
