//! # IAS Adapter Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Tenant mapping ledgers (Postgres and in-memory)
//! - The IAS REST client
//! - The UCL status callback reporter
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `ias-adapter-core`
//! - Contains all "impure" code (I/O, network)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod ias;
pub mod ucl;

// Re-export commonly used items
pub use database::{InMemoryTenantMappingRepository, PostgresTenantMappingRepository};
pub use errors::InfraError;
pub use http::HttpClient;
pub use ias::IasRestClient;
pub use ucl::HttpStatusReporter;
