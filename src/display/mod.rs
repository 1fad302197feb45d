//! Display formatting for terminal output
//!
//! Plain-text renderings of expenses, backups and storage usage.

pub mod backup;
pub mod expense;

pub use backup::{
    format_backup_details, format_backup_list, format_duration, format_size,
    format_storage_usage,
};
pub use expense::{format_expense_details, format_expense_register, format_expense_row};
