//! Import and export CLI commands

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use super::report_backup;
use crate::codec::Format;
use crate::config::paths::TrackerPaths;
use crate::error::TrackerResult;
use crate::services::DataTransfer;
use crate::storage::ExpenseStore;

/// Export file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl From<ExportFormat> for Format {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Format::Json,
            ExportFormat::Csv => Format::Csv,
        }
    }
}

/// Import/export subcommands
#[derive(Subcommand)]
pub enum TransferCommands {
    /// Export all expenses to a file
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Directory to write into (defaults to the exports directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import expenses from a JSON or CSV file
    ///
    /// JSON replaces all expenses. CSV rows are appended unless --replace
    /// is given.
    Import {
        /// Path to the file
        file: PathBuf,

        /// Replace existing expenses instead of appending (CSV only)
        #[arg(short, long)]
        replace: bool,
    },
}

/// Handle an import/export command
pub fn handle_transfer_command(
    store: &ExpenseStore,
    paths: &TrackerPaths,
    cmd: TransferCommands,
) -> TrackerResult<()> {
    let transfer = DataTransfer::new(store);

    match cmd {
        TransferCommands::Export { format, output } => {
            let export = transfer.export(format.into())?;
            let dir = output.unwrap_or_else(|| paths.exports_dir());
            let path = export.write_to(&dir)?;
            println!(
                "Exported {} expense data to {}",
                Format::from(format),
                path.display()
            );
        }

        TransferCommands::Import { file, replace } => {
            let committed = transfer.import_file(&file, replace)?;
            report_backup(&committed);

            let summary = &committed.value;
            for skipped in &summary.skipped {
                eprintln!("Warning: {}", skipped);
            }

            println!(
                "Imported {} expense(s) from {} file {}",
                summary.imported,
                summary.format,
                file.display()
            );
            if !summary.skipped.is_empty() {
                println!("Skipped {} invalid row(s).", summary.skipped.len());
            }
            println!("Total expenses: {}", summary.total);
        }
    }

    Ok(())
}
