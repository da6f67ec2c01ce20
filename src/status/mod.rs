//! Investigation status history
//!
//! Each status change is one appended record; the current status of an
//! entity is the record with the latest timestamp.

pub mod log;

pub use log::{InvestigationStatus, StatusEntry, StatusError, StatusLog, StatusResult};
