//! Backup entry model
//!
//! A backup is an immutable snapshot of the whole expense table. Entries are
//! only ever appended to the backup log or deleted from it, never edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::expense::Expense;
use super::ids::BackupId;

/// How a backup came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackupKind {
    /// Taken automatically after a mutating operation
    #[default]
    Auto,
    /// Requested explicitly by the user
    Manual,
}

impl fmt::Display for BackupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// A snapshot of the expense table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    /// Auto-incremented id
    pub id: BackupId,
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,
    /// Human-readable label
    pub label: String,
    /// Automatic or manual
    #[serde(rename = "type", default)]
    pub kind: BackupKind,
    /// Full copy of the expense table
    pub data: Vec<Expense>,
    /// Number of records in `data`
    pub count: usize,
}

impl Backup {
    /// Create a backup entry; the label defaults to the formatted timestamp
    pub fn new(
        id: BackupId,
        timestamp: DateTime<Utc>,
        kind: BackupKind,
        label: Option<String>,
        data: Vec<Expense>,
    ) -> Self {
        let label = label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| default_label(timestamp));
        let count = data.len();
        Self {
            id,
            timestamp,
            label,
            kind,
            data,
            count,
        }
    }

    /// Recency ordering key: newer timestamp first, higher id breaks ties
    pub fn recency_key(&self) -> (DateTime<Utc>, BackupId) {
        (self.timestamp, self.id)
    }
}

/// Format the default label for a backup taken at `timestamp`
pub fn default_label(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_label() {
        let ts = Utc.with_ymd_and_hms(2024, 4, 1, 9, 30, 0).unwrap();
        let backup = Backup::new(BackupId::new(1), ts, BackupKind::Auto, None, Vec::new());
        assert_eq!(backup.label, "2024-04-01 09:30:00 UTC");
        assert_eq!(backup.count, 0);
    }

    #[test]
    fn test_blank_label_falls_back_to_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 4, 1, 9, 30, 0).unwrap();
        let backup = Backup::new(
            BackupId::new(1),
            ts,
            BackupKind::Manual,
            Some("  ".into()),
            Vec::new(),
        );
        assert_eq!(backup.label, default_label(ts));
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&BackupKind::Manual).unwrap();
        assert_eq!(json, "\"manual\"");
    }
}
