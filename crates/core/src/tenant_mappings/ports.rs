//! Port interfaces for tenant mapping reconciliation
//!
//! These traits define the boundaries between the reconciliation logic and
//! the ledger storage and IAS implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use ias_adapter_domain::{Application, Result, TenantMapping, UpdateConsumedApisData};
use uuid::Uuid;

/// Durable per-formation ledger with one row per application.
#[async_trait]
pub trait TenantMappingRepository: Send + Sync {
    /// Insert or replace the row for `(formation_id, application_id)`.
    async fn upsert_tenant_mapping(
        &self,
        formation_id: Uuid,
        application_id: Uuid,
        mapping: &TenantMapping,
    ) -> Result<()>;

    /// All rows of a formation keyed by application id.
    async fn list_tenant_mappings(&self, formation_id: Uuid)
        -> Result<HashMap<Uuid, TenantMapping>>;

    /// Delete the row for `(formation_id, application_id)`. Deleting a
    /// missing row succeeds.
    async fn delete_tenant_mapping(&self, formation_id: Uuid, application_id: Uuid) -> Result<()>;

    /// Check that the storage is reachable.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Facade over the IAS `Applications/v1` API.
#[async_trait]
pub trait IasClient: Send + Sync {
    /// Find the single IAS application registered for `client_id`.
    ///
    /// Fails with `IasApplicationNotFound` on zero matches and with
    /// `AmbiguousIasApplication` on more than one.
    async fn get_application(&self, ias_host: &str, client_id: &str) -> Result<Application>;

    /// Add or remove the requested consumed APIs on `data.consumer`, naming
    /// `data.provider`. Issues a PATCH only when the set size changes.
    async fn update_application_consumed_apis(&self, data: &UpdateConsumedApisData) -> Result<()>;
}

/// Anything that can process a validated tenant mapping notification.
#[async_trait]
pub trait TenantMappingProcessor: Send + Sync {
    async fn process_tenant_mapping(&self, mapping: &TenantMapping) -> Result<()>;
}
