//! Asynchronous assignment status reporting

pub mod ports;
pub mod processor;

pub use processor::{resolve_status, ReconciliationOutcome, StatusProcessor};
