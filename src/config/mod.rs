//! Configuration module for the expense tracker
//!
//! This module provides configuration management including:
//! - Path resolution for the storage container and exports
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::TrackerPaths;
pub use settings::{BackupRetention, Settings};
