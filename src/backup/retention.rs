//! Backup retention policy
//!
//! Keeps the backup log bounded: after every insert, everything beyond the
//! `limit` most recent entries is evicted, oldest first. Recency is the
//! backup timestamp; entries with equal timestamps are ordered by id, so the
//! one inserted earlier counts as older.

use crate::config::settings::{BackupRetention, DEFAULT_RETENTION_LIMIT};
use crate::models::{Backup, BackupId};

use super::log::BackupLog;

/// Bounded-history retention policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    limit: usize,
}

impl RetentionPolicy {
    /// Create a policy keeping at most `limit` backups (at least one)
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Ids of the backups that fall outside the retention window
    pub fn select_evictions(&self, backups: &[Backup]) -> Vec<BackupId> {
        if backups.len() <= self.limit {
            return Vec::new();
        }

        let mut ordered: Vec<&Backup> = backups.iter().collect();
        ordered.sort_by(|a, b| b.recency_key().cmp(&a.recency_key()));

        ordered
            .into_iter()
            .skip(self.limit)
            .map(|b| b.id)
            .collect()
    }

    /// Evict excess backups from the log, returning the removed ids
    pub fn enforce(&self, log: &mut BackupLog) -> Vec<BackupId> {
        let evicted = self.select_evictions(log.entries());
        for id in &evicted {
            log.remove(*id);
        }
        evicted
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION_LIMIT)
    }
}

impl From<&BackupRetention> for RetentionPolicy {
    fn from(retention: &BackupRetention) -> Self {
        Self::new(retention.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BackupKind;
    use chrono::{Duration, TimeZone, Utc};

    fn log_with(timestamps_secs: &[i64]) -> BackupLog {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut log = BackupLog::default();
        for secs in timestamps_secs {
            log.append(
                base + Duration::seconds(*secs),
                BackupKind::Auto,
                None,
                Vec::new(),
            );
        }
        log
    }

    #[test]
    fn test_under_limit_evicts_nothing() {
        let mut log = log_with(&[1, 2, 3]);
        let evicted = RetentionPolicy::new(3).enforce(&mut log);
        assert!(evicted.is_empty());
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_evicts_oldest_by_timestamp() {
        // Insertion order differs from timestamp order
        let mut log = log_with(&[30, 10, 50, 20, 40]);
        let evicted = RetentionPolicy::new(3).enforce(&mut log);

        // ids 2 (t=10) and 4 (t=20) are the oldest
        assert_eq!(evicted, vec![BackupId::new(4), BackupId::new(2)]);
        let kept: Vec<u64> = log.newest_first().iter().map(|b| b.id.value()).collect();
        assert_eq!(kept, vec![3, 5, 1]);
    }

    #[test]
    fn test_equal_timestamps_break_ties_by_id() {
        let mut log = log_with(&[5, 5, 5, 5]);
        let evicted = RetentionPolicy::new(2).enforce(&mut log);

        assert_eq!(evicted, vec![BackupId::new(2), BackupId::new(1)]);
        let kept: Vec<u64> = log.newest_first().iter().map(|b| b.id.value()).collect();
        assert_eq!(kept, vec![4, 3]);
    }

    #[test]
    fn test_limit_is_at_least_one() {
        assert_eq!(RetentionPolicy::new(0).limit(), 1);
    }

    #[test]
    fn test_from_settings() {
        let policy = RetentionPolicy::from(&BackupRetention { limit: 7 });
        assert_eq!(policy.limit(), 7);
        assert_eq!(RetentionPolicy::default().limit(), 50);
    }
}
