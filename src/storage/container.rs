//! Storage container management
//!
//! The container is the `store/` directory holding both tables. Opening it
//! takes an exclusive advisory lock on `LOCK`, so a second handle against the
//! same container fails instead of racing the first one. The lock is released
//! when the container is dropped, and by the OS if the process dies.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::config::paths::TrackerPaths;
use crate::error::{TrackerError, TrackerResult};

use super::file_io::file_size;

/// Bytes used by the container and the space left on its disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageUsage {
    pub expenses_bytes: u64,
    pub backups_bytes: u64,
    /// Free space on the filesystem, if it could be queried
    pub available_bytes: Option<u64>,
}

impl StorageUsage {
    pub fn used_bytes(&self) -> u64 {
        self.expenses_bytes + self.backups_bytes
    }

    /// Share of the reachable space already used, in percent
    pub fn percentage(&self) -> Option<f64> {
        let available = self.available_bytes?;
        let quota = self.used_bytes() + available;
        if quota == 0 {
            return None;
        }
        Some(self.used_bytes() as f64 / quota as f64 * 100.0)
    }
}

/// An opened, locked storage container
#[derive(Debug)]
pub struct StorageContainer {
    root: PathBuf,
    expenses_file: PathBuf,
    backups_file: PathBuf,
    /// Held for exclusive access
    _lock_file: File,
}

impl StorageContainer {
    /// Create the container directory if needed and lock it
    pub fn open(paths: &TrackerPaths) -> TrackerResult<Self> {
        paths
            .ensure_directories()
            .map_err(|e| TrackerError::StorageUnavailable(e.to_string()))?;

        let root = paths.store_dir();
        let lock_path = paths.lock_file();
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                TrackerError::StorageUnavailable(format!(
                    "Failed to open lock file {}: {}",
                    lock_path.display(),
                    e
                ))
            })?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(TrackerError::StorageUnavailable(format!(
                "{} is already open by another handle",
                root.display()
            )));
        }

        Ok(Self {
            root,
            expenses_file: paths.expenses_file(),
            backups_file: paths.backups_file(),
            _lock_file: lock_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn expenses_file(&self) -> &Path {
        &self.expenses_file
    }

    pub fn backups_file(&self) -> &Path {
        &self.backups_file
    }

    /// Measure the container
    pub fn usage(&self) -> StorageUsage {
        StorageUsage {
            expenses_bytes: file_size(&self.expenses_file),
            backups_bytes: file_size(&self.backups_file),
            available_bytes: fs2::available_space(&self.root).ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_container() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let container = StorageContainer::open(&paths).unwrap();
        assert!(container.root().is_dir());
        assert!(paths.lock_file().exists());
    }

    #[test]
    fn test_second_open_is_refused_until_drop() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let first = StorageContainer::open(&paths).unwrap();
        let err = StorageContainer::open(&paths).unwrap_err();
        assert!(matches!(err, TrackerError::StorageUnavailable(_)));

        drop(first);
        assert!(StorageContainer::open(&paths).is_ok());
    }

    #[test]
    fn test_open_fails_when_base_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let paths = TrackerPaths::with_base_dir(blocker);
        let err = StorageContainer::open(&paths).unwrap_err();
        assert!(matches!(err, TrackerError::StorageUnavailable(_)));
    }

    #[test]
    fn test_usage_percentage() {
        let usage = StorageUsage {
            expenses_bytes: 100,
            backups_bytes: 300,
            available_bytes: Some(1600),
        };
        assert_eq!(usage.used_bytes(), 400);
        assert_eq!(usage.percentage(), Some(20.0));

        let unknown = StorageUsage {
            available_bytes: None,
            ..usage
        };
        assert_eq!(unknown.percentage(), None);
    }
}
