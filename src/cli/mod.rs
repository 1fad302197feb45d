//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the store and services.

pub mod backup;
pub mod config;
pub mod expense;
pub mod summary;
pub mod transfer;

pub use backup::{handle_backup_command, BackupCommands};
pub use config::{handle_config_command, handle_storage_command, ConfigArgs};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use summary::{handle_summary_command, SummaryArgs};
pub use transfer::{handle_transfer_command, TransferCommands};

use chrono::{Local, NaiveDate};
use clap::Args;

use crate::error::{TrackerError, TrackerResult};
use crate::models::parse_date;
use crate::reports::DateRange;
use crate::storage::Committed;

/// Date window shared by `list` and `summary`
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Start date (inclusive)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (inclusive)
    #[arg(long)]
    pub to: Option<String>,

    /// Calendar month (YYYY-MM)
    #[arg(long, conflicts_with_all = ["from", "to", "last"])]
    pub month: Option<String>,

    /// The last N days, including today
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub last: Option<u32>,
}

impl RangeArgs {
    /// Resolve the options into a date range
    pub fn to_range(&self, today: NaiveDate) -> TrackerResult<DateRange> {
        if let Some(month) = &self.month {
            let first = NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
                .map_err(|_| {
                    TrackerError::Parse(format!("Invalid month '{}', expected YYYY-MM", month))
                })?;
            return Ok(DateRange::month_of(first));
        }

        if let Some(days) = self.last {
            return Ok(DateRange::last_days(today, days));
        }

        Ok(DateRange {
            start: self.from.as_deref().map(parse_cli_date).transpose()?,
            end: self.to.as_deref().map(parse_cli_date).transpose()?,
        })
    }
}

/// Parse a date argument; `today` is accepted too
pub fn parse_cli_date(raw: &str) -> TrackerResult<NaiveDate> {
    if raw.trim().eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    parse_date(raw).ok_or_else(|| {
        TrackerError::Parse(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
    })
}

/// Print a warning when the automatic backup after a change failed
pub fn report_backup<T>(committed: &Committed<T>) {
    if let Some(err) = committed.backup_warning() {
        eprintln!("Warning: change saved, but the automatic backup failed: {}", err);
    }
}
