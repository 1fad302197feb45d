//! Expense Tracker - local-first personal and shared expense tracking
//!
//! This library keeps an expense list in a locked, file-backed store that
//! snapshots itself after every change. A bounded rolling history of
//! snapshots allows point-in-time restore, and the list can be moved in and
//! out as JSON or CSV.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, backups, ids, money)
//! - `storage`: The locked store with its expense table and backup log
//! - `backup`: Backup log, retention policy and restore preparation
//! - `codec`: JSON and CSV encoding
//! - `services`: Import/export orchestration
//! - `reports`: Summaries over date ranges
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `expense` binary
//! - `logging`: `tracing` subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::config::{paths::TrackerPaths, settings::Settings};
//! use expense_tracker::storage::{ExpenseStore, StoreOptions};
//!
//! let paths = TrackerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = ExpenseStore::open(&paths, StoreOptions::from_settings(&settings))?;
//! ```

pub mod backup;
pub mod cli;
pub mod codec;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TrackerError, TrackerResult};
pub use logging::init_tracing;
pub use storage::{BackupOutcome, Committed, ExpenseStore, StoreOptions};
