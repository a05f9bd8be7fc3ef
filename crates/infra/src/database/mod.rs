//! Tenant mapping ledger implementations

pub mod memory;
pub mod postgres;

pub use memory::InMemoryTenantMappingRepository;
pub use postgres::PostgresTenantMappingRepository;
