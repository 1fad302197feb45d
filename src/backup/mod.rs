//! Backup system for the expense tracker
//!
//! Provides the rolling snapshot log, its retention policy, and restore
//! preparation. The store drives all three: every mutating operation appends
//! a snapshot of the full expense table, the retention policy trims the log
//! back to its limit, and a restore replaces the table from a snapshot.
//!
//! # Backup Format
//!
//! `backups.json` holds:
//! - `schema_version`: Version for migration support
//! - `next_id`: Next auto-increment id
//! - `backups`: Entries with `id`, `timestamp`, `label`, `type`, `data`, `count`
//!
//! # Retention Policy
//!
//! By default the 50 most recent backups are kept.

pub mod log;
pub mod restore;
pub mod retention;

pub use log::BackupLog;
pub use restore::{prepare_restore, RestoreResult};
pub use retention::RetentionPolicy;
