//! Storage layer for the expense tracker
//!
//! `ExpenseStore` owns the expense table and the backup log of one locked
//! container. Every mutating operation is one unit: the primary table write
//! commits first, then a snapshot of the resulting table is appended to the
//! backup log and the retention policy trims it, in a second atomic write.
//! The internal mutex is held across the whole sequence.

pub mod container;
pub mod file_io;
pub mod table;

pub use container::{StorageContainer, StorageUsage};
pub use file_io::{read_json, write_json_atomic};
pub use table::ExpenseTable;

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::backup::{prepare_restore, BackupLog, RestoreResult, RetentionPolicy};
use crate::config::paths::TrackerPaths;
use crate::config::settings::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Backup, BackupId, BackupKind, Expense, ExpenseId};

/// Behaviour knobs for an opened store
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    pub retention: RetentionPolicy,
    /// Wipe the backup log when the expenses are cleared
    pub clear_backups_on_clear: bool,
}

impl StoreOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            retention: RetentionPolicy::from(&settings.backup_retention),
            clear_backups_on_clear: settings.clear_backups_on_clear,
        }
    }
}

/// What happened to the snapshot that follows a committed write
#[derive(Debug)]
pub enum BackupOutcome {
    Created(BackupId),
    /// The primary write stands; only the snapshot is missing
    Failed(TrackerError),
}

/// A committed write together with its backup outcome
#[derive(Debug)]
pub struct Committed<T> {
    pub value: T,
    pub backup: BackupOutcome,
}

impl<T> Committed<T> {
    pub fn backup_id(&self) -> Option<BackupId> {
        match self.backup {
            BackupOutcome::Created(id) => Some(id),
            BackupOutcome::Failed(_) => None,
        }
    }

    /// The snapshot error, if the snapshot step failed
    pub fn backup_warning(&self) -> Option<&TrackerError> {
        match &self.backup {
            BackupOutcome::Created(_) => None,
            BackupOutcome::Failed(err) => Some(err),
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

struct StoreState {
    expenses: ExpenseTable,
    backups: BackupLog,
}

/// Handle to an opened expense store
pub struct ExpenseStore {
    container: StorageContainer,
    options: StoreOptions,
    state: Mutex<StoreState>,
}

impl ExpenseStore {
    /// Open (or create) the store under `paths`
    ///
    /// Existing tables are loaded, missing ones are created empty. Any
    /// failure, including a lock held by another handle, is reported as
    /// `StorageUnavailable`.
    pub fn open(paths: &TrackerPaths, options: StoreOptions) -> TrackerResult<Self> {
        let container = StorageContainer::open(paths)?;

        let expenses = load_or_init::<ExpenseTable>(container.expenses_file())?;
        let backups = load_or_init::<BackupLog>(container.backups_file())?;

        debug!(
            root = %container.root().display(),
            expenses = expenses.len(),
            backups = backups.len(),
            "Opened expense store"
        );

        Ok(Self {
            container,
            options,
            state: Mutex::new(StoreState { expenses, backups }),
        })
    }

    /// Close the store
    ///
    /// The container lock is released when `self` is dropped at the end of
    /// this call.
    pub fn close(self) {
        debug!(root = %self.container.root().display(), "Closed expense store");
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Insert a record, or overwrite the one with the same id
    pub fn add_or_update(&self, expense: Expense) -> TrackerResult<Committed<ExpenseId>> {
        let mut state = self.lock()?;

        let mut next = state.expenses.clone();
        let id = next.upsert(expense);
        self.write_expenses(&mut state, next)?;
        debug!(id = %id, "Saved expense");

        let backup = self.auto_backup(&mut state, None, false);
        Ok(Committed { value: id, backup })
    }

    pub fn get(&self, id: &ExpenseId) -> TrackerResult<Option<Expense>> {
        let state = self.lock()?;
        Ok(state.expenses.get(id).cloned())
    }

    /// All records in insertion order
    pub fn get_all(&self) -> TrackerResult<Vec<Expense>> {
        let state = self.lock()?;
        Ok(state.expenses.records().to_vec())
    }

    /// Delete a record; an unknown id is not an error
    pub fn delete(&self, id: &ExpenseId) -> TrackerResult<Committed<bool>> {
        let mut state = self.lock()?;

        let mut next = state.expenses.clone();
        let removed = next.remove(id);
        if removed {
            self.write_expenses(&mut state, next)?;
        }
        debug!(id = %id, removed, "Deleted expense");

        let backup = self.auto_backup(&mut state, None, false);
        Ok(Committed {
            value: removed,
            backup,
        })
    }

    /// Remove every record, returning how many were dropped
    pub fn clear(&self) -> TrackerResult<Committed<usize>> {
        let mut state = self.lock()?;

        let mut next = state.expenses.clone();
        let removed = next.clear();
        self.write_expenses(&mut state, next)?;
        debug!(removed, "Cleared expenses");

        let wipe = self.options.clear_backups_on_clear;
        let backup = self.auto_backup(&mut state, None, wipe);
        Ok(Committed {
            value: removed,
            backup,
        })
    }

    /// Replace the whole table with `records` as one unit
    pub fn replace_all(
        &self,
        records: Vec<Expense>,
        label: impl Into<String>,
    ) -> TrackerResult<Committed<usize>> {
        self.replace_with(label, |_| records)
    }

    /// Replace the table with a function of its current records
    ///
    /// The read and the write happen under one lock, so no other write can
    /// slip in between.
    pub fn replace_with<F>(
        &self,
        label: impl Into<String>,
        f: F,
    ) -> TrackerResult<Committed<usize>>
    where
        F: FnOnce(Vec<Expense>) -> Vec<Expense>,
    {
        let mut state = self.lock()?;

        let next = ExpenseTable::from_records(f(state.expenses.records().to_vec()));
        let count = next.len();
        self.write_expenses(&mut state, next)?;
        debug!(count, "Replaced all expenses");

        let backup = self.auto_backup(&mut state, Some(label.into()), false);
        Ok(Committed {
            value: count,
            backup,
        })
    }

    /// Take a manual snapshot of the current table
    pub fn create_backup(&self, label: Option<String>) -> TrackerResult<BackupId> {
        let mut state = self.lock()?;
        let id = self.append_snapshot(&mut state, BackupKind::Manual, label, false)?;
        info!(backup = %id, "Created manual backup");
        Ok(id)
    }

    /// Backups sorted newest first
    pub fn list_backups(&self) -> TrackerResult<Vec<Backup>> {
        let state = self.lock()?;
        Ok(state.backups.newest_first())
    }

    pub fn get_backup(&self, id: BackupId) -> TrackerResult<Option<Backup>> {
        let state = self.lock()?;
        Ok(state.backups.get(id).cloned())
    }

    /// Replace the table with a backup's snapshot, then snapshot the result
    pub fn restore(&self, id: BackupId) -> TrackerResult<Committed<RestoreResult>> {
        let mut state = self.lock()?;

        let (records, result) = {
            let backup = state
                .backups
                .get(id)
                .ok_or_else(|| TrackerError::backup_not_found(id.to_string()))?;
            let records = prepare_restore(backup);
            let result = RestoreResult::from_backup(backup, records.len());
            (records, result)
        };

        self.write_expenses(&mut state, ExpenseTable::from_records(records))?;
        info!(backup = %id, count = result.restored_count, "Restored backup");

        let label = format!("Restored from backup {}", id);
        let backup = self.auto_backup(&mut state, Some(label), false);
        Ok(Committed {
            value: result,
            backup,
        })
    }

    /// Delete a backup; an unknown id is a no-op
    pub fn delete_backup(&self, id: BackupId) -> TrackerResult<bool> {
        let mut state = self.lock()?;

        let mut next = state.backups.clone();
        if !next.remove(id) {
            return Ok(false);
        }
        write_json_atomic(self.container.backups_file(), &next)
            .map_err(|e| TrackerError::WriteFailed(e.to_string()))?;
        state.backups = next;

        debug!(backup = %id, "Deleted backup");
        Ok(true)
    }

    /// Bytes used by the container
    pub fn usage(&self) -> StorageUsage {
        self.container.usage()
    }

    fn lock(&self) -> TrackerResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire lock: {}", e)))
    }

    /// Persist `next` as the expense table; memory changes only on success
    fn write_expenses(&self, state: &mut StoreState, next: ExpenseTable) -> TrackerResult<()> {
        write_json_atomic(self.container.expenses_file(), &next)
            .map_err(|e| TrackerError::WriteFailed(e.to_string()))?;
        state.expenses = next;
        Ok(())
    }

    fn auto_backup(
        &self,
        state: &mut StoreState,
        label: Option<String>,
        wipe_first: bool,
    ) -> BackupOutcome {
        match self.append_snapshot(state, BackupKind::Auto, label, wipe_first) {
            Ok(id) => BackupOutcome::Created(id),
            Err(err) => {
                warn!(error = %err, "Change saved but automatic backup failed");
                BackupOutcome::Failed(err)
            }
        }
    }

    /// Append a snapshot and enforce retention in a single log write
    fn append_snapshot(
        &self,
        state: &mut StoreState,
        kind: BackupKind,
        label: Option<String>,
        wipe_first: bool,
    ) -> TrackerResult<BackupId> {
        let mut next = state.backups.clone();
        if wipe_first {
            next.clear();
        }

        let data = state.expenses.records().to_vec();
        let id = next.append(Utc::now(), kind, label, data);
        let evicted = self.options.retention.enforce(&mut next);

        write_json_atomic(self.container.backups_file(), &next)
            .map_err(|e| TrackerError::BackupFailed(e.to_string()))?;
        state.backups = next;

        debug!(backup = %id, kind = %kind, evicted = evicted.len(), "Appended backup");
        Ok(id)
    }
}

fn load_or_init<T>(path: &std::path::Path) -> TrackerResult<T>
where
    T: Default + serde::Serialize + serde::de::DeserializeOwned,
{
    let unavailable = |e: TrackerError| TrackerError::StorageUnavailable(e.to_string());

    match read_json::<T, _>(path).map_err(unavailable)? {
        Some(table) => Ok(table),
        None => {
            let table = T::default();
            write_json_atomic(path, &table).map_err(unavailable)?;
            Ok(table)
        }
    }
}
