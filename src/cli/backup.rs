//! Backup CLI commands
//!
//! Implements CLI commands for the rolling backup log.

use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;

use super::report_backup;
use crate::config::paths::TrackerPaths;
use crate::display::{format_backup_details, format_backup_list};
use crate::error::{TrackerError, TrackerResult};
use crate::models::BackupId;
use crate::services::DataTransfer;
use crate::storage::ExpenseStore;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Take a manual backup of the current expenses
    Create {
        /// Label for the backup (defaults to the current time)
        #[arg(short, long)]
        label: Option<String>,
    },

    /// List backups, newest first
    List,

    /// Replace all expenses with a backup's snapshot
    Restore {
        /// Backup ID (e.g. 7 or #7)
        id: BackupId,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete a backup
    Delete {
        /// Backup ID
        id: BackupId,
    },

    /// Write a backup's snapshot to a JSON file
    Export {
        /// Backup ID
        id: BackupId,

        /// Directory to write into (defaults to the exports directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    store: &ExpenseStore,
    paths: &TrackerPaths,
    cmd: BackupCommands,
) -> TrackerResult<()> {
    match cmd {
        BackupCommands::Create { label } => {
            let id = store.create_backup(label)?;
            println!("Backup created: {}", id);
            if let Some(backup) = store.get_backup(id)? {
                print!("{}", format_backup_details(&backup));
            }
        }

        BackupCommands::List => {
            let backups = store.list_backups()?;
            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: expense backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();
            print!("{}", format_backup_list(&backups, Utc::now()));
            println!(
                "Retention limit: {} backup(s)",
                store.options().retention.limit()
            );
        }

        BackupCommands::Restore { id, force } => {
            let backup = store
                .get_backup(id)?
                .ok_or_else(|| TrackerError::backup_not_found(id.to_string()))?;

            println!("Backup Information");
            println!("==================");
            print!("{}", format_backup_details(&backup));
            println!();

            if !force {
                println!("WARNING: This will replace ALL current expenses!");
                println!("The current state stays recoverable from the backup log.");
                println!("To proceed, run again with --force flag:");
                println!("  expense backup restore {} --force", id.value());
                return Ok(());
            }

            let committed = store.restore(id)?;
            report_backup(&committed);

            println!("Restore complete!");
            println!("{}", committed.value.summary());
            if let Some(snapshot) = committed.backup_id() {
                println!("Post-restore backup: {}", snapshot);
            }
        }

        BackupCommands::Delete { id } => {
            if store.delete_backup(id)? {
                println!("Deleted backup {}", id);
            } else {
                println!("No backup {}; nothing deleted.", id);
            }
        }

        BackupCommands::Export { id, output } => {
            let export = DataTransfer::new(store).export_backup(id)?;
            let dir = output.unwrap_or_else(|| paths.exports_dir());
            let path = export.write_to(&dir)?;
            println!("Exported backup {} to {}", id, path.display());
        }
    }

    Ok(())
}
