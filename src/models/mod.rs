//! Core data models for the expense tracker
//!
//! This module contains the data structures shared by the store, the codecs
//! and the reports: expense records, backup entries, ids and amounts.

pub mod backup;
pub mod expense;
pub mod ids;
pub mod money;

pub use backup::{Backup, BackupKind};
pub use expense::{
    parse_date, Expense, ExpenseSchema, Person, DEFAULT_CATEGORIES, DEFAULT_CATEGORY,
    DEFAULT_PAYMENT_MODE,
};
pub use ids::{BackupId, ExpenseId};
pub use money::{Money, MoneyParseError};
