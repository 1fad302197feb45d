//! Import and export of the expense list
//!
//! Composes the codecs with the store: dumping the table to a file,
//! replacing it from JSON, and appending (or replacing) from CSV. Every
//! import is written as one store operation with one snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use crate::codec::{self, csv, json, Format};
use crate::error::{TrackerError, TrackerResult};
use crate::models::BackupId;
use crate::storage::{Committed, ExpenseStore};

/// Label of the snapshot taken after a JSON import
pub const JSON_IMPORT_LABEL: &str = "JSON import";
/// Label of the snapshot taken after a CSV import
pub const CSV_IMPORT_LABEL: &str = "CSV import";

/// An export ready to be written somewhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

impl ExportFile {
    /// Write the export into `dir`, returning the full path
    pub fn write_to(&self, dir: &Path) -> TrackerResult<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| {
            TrackerError::Export(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let path = dir.join(&self.filename);
        fs::write(&path, &self.contents).map_err(|e| {
            TrackerError::Export(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), bytes = self.contents.len(), "Wrote export");
        Ok(path)
    }
}

/// What an import did
#[derive(Debug)]
pub struct ImportSummary {
    pub format: Format,
    /// Records taken from the file
    pub imported: usize,
    /// Records in the table afterwards
    pub total: usize,
    /// Rejected CSV rows
    pub skipped: Vec<TrackerError>,
}

/// Service for moving expenses in and out of files
pub struct DataTransfer<'a> {
    store: &'a ExpenseStore,
}

impl<'a> DataTransfer<'a> {
    pub fn new(store: &'a ExpenseStore) -> Self {
        Self { store }
    }

    /// Export every record as a JSON array
    pub fn export_json(&self) -> TrackerResult<ExportFile> {
        let records = self.store.get_all()?;
        Ok(ExportFile {
            filename: dated_filename(Format::Json),
            contents: json::encode(&records)?,
        })
    }

    /// Export every record as CSV
    pub fn export_csv(&self) -> TrackerResult<ExportFile> {
        let records = self.store.get_all()?;
        Ok(ExportFile {
            filename: dated_filename(Format::Csv),
            contents: csv::encode(&records),
        })
    }

    pub fn export(&self, format: Format) -> TrackerResult<ExportFile> {
        match format {
            Format::Json => self.export_json(),
            Format::Csv => self.export_csv(),
        }
    }

    /// Export one backup's snapshot as JSON
    pub fn export_backup(&self, id: BackupId) -> TrackerResult<ExportFile> {
        let backup = self
            .store
            .get_backup(id)?
            .ok_or_else(|| TrackerError::backup_not_found(id.to_string()))?;

        Ok(ExportFile {
            filename: format!(
                "expense-backup-{}.json",
                backup.timestamp.format("%Y%m%d-%H%M%S")
            ),
            contents: json::encode(&backup.data)?,
        })
    }

    /// Replace the whole table with the records of a JSON export
    pub fn import_json(&self, text: &str) -> TrackerResult<Committed<ImportSummary>> {
        let records = json::decode(text)?;
        let imported = records.len();

        let committed = self.store.replace_all(records, JSON_IMPORT_LABEL)?;
        info!(imported, "Imported expenses from JSON");

        Ok(Committed {
            value: ImportSummary {
                format: Format::Json,
                imported,
                total: committed.value,
                skipped: Vec::new(),
            },
            backup: committed.backup,
        })
    }

    /// Import CSV rows, appending to the table unless `replace` is set
    pub fn import_csv(
        &self,
        text: &str,
        replace: bool,
    ) -> TrackerResult<Committed<ImportSummary>> {
        let decoded = csv::decode(text)?;
        let imported = decoded.expenses.len();

        let committed = self.store.replace_with(CSV_IMPORT_LABEL, |existing| {
            codec::merge(decoded.expenses, existing, replace)
        })?;
        info!(
            imported,
            skipped = decoded.skipped.len(),
            replace,
            "Imported expenses from CSV"
        );

        Ok(Committed {
            value: ImportSummary {
                format: Format::Csv,
                imported,
                total: committed.value,
                skipped: decoded.skipped,
            },
            backup: committed.backup,
        })
    }

    /// Import a file, choosing the codec by extension or by content
    ///
    /// JSON always replaces the table; `replace` only affects CSV.
    pub fn import_file(
        &self,
        path: &Path,
        replace: bool,
    ) -> TrackerResult<Committed<ImportSummary>> {
        let text = fs::read_to_string(path).map_err(|e| {
            TrackerError::Import(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let format = Format::from_path(path)
            .or_else(|| Format::sniff(&text))
            .ok_or_else(|| {
                TrackerError::Import(format!(
                    "Unsupported file format: {} (expected .json or .csv)",
                    path.display()
                ))
            })?;
        debug!(path = %path.display(), format = %format, "Importing file");

        match format {
            Format::Json => self.import_json(&text),
            Format::Csv => self.import_csv(&text, replace),
        }
    }
}

fn dated_filename(format: Format) -> String {
    format!(
        "expenses-{}.{}",
        Local::now().format("%Y-%m-%d"),
        format.extension()
    )
}
