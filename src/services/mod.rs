//! Service layer for the expense tracker
//!
//! The service layer composes the codecs with the store for operations that
//! span both, such as importing a file as one store write.

pub mod transfer;

pub use transfer::{DataTransfer, ExportFile, ImportSummary};
