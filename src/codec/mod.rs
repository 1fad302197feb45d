//! Stateless codecs between expense records and exchange formats
//!
//! - `json`: the full expense list as a JSON array
//! - `csv`: spreadsheet-friendly rows with tolerant, header-driven decoding

pub mod csv;
pub mod json;

use std::fmt;
use std::path::Path;

pub use self::csv::{merge, CsvImport, CSV_HEADER};

/// Exchange formats understood by import and export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Guess the format from file contents
    ///
    /// JSON exports always start with `[`; anything whose first line has a
    /// comma and names a date or amount column is taken as CSV.
    pub fn sniff(text: &str) -> Option<Self> {
        let trimmed = text.trim_start_matches('\u{feff}').trim_start();
        if trimmed.starts_with('[') {
            return Some(Self::Json);
        }

        let first_line = trimmed.lines().next()?.to_lowercase();
        if first_line.contains(',')
            && (first_line.contains("date") || first_line.contains("amount"))
        {
            return Some(Self::Csv);
        }
        None
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Csv => write!(f, "CSV"),
        }
    }
}
