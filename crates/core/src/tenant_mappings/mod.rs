//! Tenant mapping reconciliation between formation participants

pub mod locks;
pub mod ports;
pub mod service;

pub use locks::{FormationGuard, FormationLocks};
pub use service::TenantMappingsService;
