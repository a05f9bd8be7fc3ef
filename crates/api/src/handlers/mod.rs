pub mod health;
pub mod tenant_mappings;
