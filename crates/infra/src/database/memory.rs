//! In-memory tenant mapping ledger for local runs and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use ias_adapter_core::TenantMappingRepository;
use ias_adapter_domain::{Result as DomainResult, TenantMapping};
use uuid::Uuid;

/// Ledger kept in a concurrent map; lost on restart.
#[derive(Default, Clone)]
pub struct InMemoryTenantMappingRepository {
    formations: Arc<DashMap<Uuid, HashMap<Uuid, TenantMapping>>>,
}

impl InMemoryTenantMappingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantMappingRepository for InMemoryTenantMappingRepository {
    async fn upsert_tenant_mapping(
        &self,
        formation_id: Uuid,
        application_id: Uuid,
        mapping: &TenantMapping,
    ) -> DomainResult<()> {
        self.formations.entry(formation_id).or_default().insert(application_id, mapping.clone());
        Ok(())
    }

    async fn list_tenant_mappings(
        &self,
        formation_id: Uuid,
    ) -> DomainResult<HashMap<Uuid, TenantMapping>> {
        Ok(self.formations.get(&formation_id).map(|rows| rows.value().clone()).unwrap_or_default())
    }

    async fn delete_tenant_mapping(
        &self,
        formation_id: Uuid,
        application_id: Uuid,
    ) -> DomainResult<()> {
        if let Some(mut rows) = self.formations.get_mut(&formation_id) {
            rows.remove(&application_id);
        }
        self.formations.remove_if(&formation_id, |_, rows| rows.is_empty());
        Ok(())
    }
}
