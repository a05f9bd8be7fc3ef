//! UCL integration

pub mod status_reporter;

pub use status_reporter::HttpStatusReporter;
