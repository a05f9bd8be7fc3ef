//! # IAS Adapter Domain
//!
//! Business domain types for the IAS adapter.
//!
//! This crate contains:
//! - The UCL tenant mapping wire model and its validation
//! - The IAS application model and consumed API set algebra
//! - Assignment status reports sent back to UCL
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other adapter crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
