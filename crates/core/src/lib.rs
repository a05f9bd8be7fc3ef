//! # IAS Adapter Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the ledger, IAS and UCL callbacks
//! - The tenant mapping reconciliation service
//! - The async status processor
//!
//! ## Architecture Principles
//! - Only depends on `ias-adapter-domain`
//! - No database or HTTP code
//! - All external dependencies via traits

pub mod status;
pub mod tenant_mappings;

pub use status::ports::StatusReporter;
pub use status::{resolve_status, ReconciliationOutcome, StatusProcessor};
pub use tenant_mappings::ports::{IasClient, TenantMappingProcessor, TenantMappingRepository};
pub use tenant_mappings::{FormationLocks, TenantMappingsService};
