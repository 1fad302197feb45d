//! User settings for the expense tracker
//!
//! Manages backup retention, the clear-all behaviour, and display
//! preferences. Every field has a serde default so older config files keep
//! loading as new settings are added.

use serde::{Deserialize, Serialize};

use super::paths::TrackerPaths;
use crate::error::TrackerError;
use crate::models::{Money, Person};

/// Number of backups kept by default
pub const DEFAULT_RETENTION_LIMIT: usize = 50;

/// Backup retention settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Maximum number of backups kept in the log
    pub limit: usize,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RETENTION_LIMIT,
        }
    }
}

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Whether clearing all expenses also wipes the backup log
    #[serde(default)]
    pub clear_backups_on_clear: bool,

    /// Monthly budget used by summaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_budget: Option<Money>,

    /// Currency symbol for display
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Payer assumed when none is given
    #[serde(default)]
    pub default_person: Person,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₹".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backup_retention: BackupRetention::default(),
            clear_backups_on_clear: false,
            monthly_budget: None,
            currency_symbol: default_currency(),
            default_person: Person::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &TrackerPaths) -> Result<Self, TrackerError> {
        let settings_path = paths.settings_file();

        let settings = if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                TrackerError::Io(format!("Failed to read settings file: {}", e))
            })?;

            serde_json::from_str::<Settings>(&contents).map_err(|e| {
                TrackerError::Config(format!("Failed to parse settings file: {}", e))
            })?
        } else {
            // Don't save yet - let caller decide when to persist
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the store cannot honour
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.backup_retention.limit == 0 {
            return Err(TrackerError::Config(
                "backup_retention.limit must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TrackerPaths) -> Result<(), TrackerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TrackerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TrackerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
