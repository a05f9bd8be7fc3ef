//! Tenant mapping reconciliation - core business logic
//!
//! UCL notifies each participant of a formation separately and in any order.
//! The ledger remembers the latest notification per application; once both
//! participants are known, their consumed API grants are reconciled in IAS in
//! both directions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ias_adapter_domain::constants::S4_APPLICATION_TYPE;
use ias_adapter_domain::{
    Application, IasAdapterError, Operation, Result, ResultExt, TenantMapping,
    UpdateConsumedApisData,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::locks::FormationLocks;
use super::ports::{IasClient, TenantMappingProcessor, TenantMappingRepository};

/// Tenant mapping reconciliation service
pub struct TenantMappingsService {
    repository: Arc<dyn TenantMappingRepository>,
    ias: Arc<dyn IasClient>,
    locks: FormationLocks,
}

impl TenantMappingsService {
    /// Create a new service with its own formation lock registry
    pub fn new(repository: Arc<dyn TenantMappingRepository>, ias: Arc<dyn IasClient>) -> Self {
        Self { repository, ias, locks: FormationLocks::new() }
    }

    /// Share a lock registry with other services working on the same ledger.
    pub fn with_locks(mut self, locks: FormationLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Apply one notification to the ledger and IAS.
    #[instrument(
        skip_all,
        fields(
            formation_id = %mapping.formation_id,
            application_id = %mapping.application_id(),
            operation = %mapping.operation(),
        )
    )]
    pub async fn process(&self, mapping: &TenantMapping) -> Result<()> {
        let _guard = self.locks.lock(mapping.formation_id).await;

        match mapping.operation() {
            Operation::Assign => self.assign(mapping).await,
            Operation::Unassign => self.unassign(mapping).await,
        }
    }

    async fn assign(&self, mapping: &TenantMapping) -> Result<()> {
        let formation_id = mapping.formation_id;
        let application_id = mapping.application_id();
        let mappings = self.list(formation_id).await?;

        let reconciliation = if mappings.contains_key(&application_id) {
            debug!("application already recorded in formation, skipping reconciliation");
            Ok(())
        } else {
            match counterpart(&mappings, application_id) {
                Some(other) => self.update_applications_consumed_apis(mapping, other).await,
                None => {
                    info!("no counterpart in formation yet, deferring reconciliation");
                    Ok(())
                }
            }
        };

        // The ledger always records the latest notification, even when the
        // reconciliation above failed.
        let upsert = self
            .repository
            .upsert_tenant_mapping(formation_id, application_id, mapping)
            .await
            .context("failed to upsert tenant mapping");

        match (upsert, reconciliation) {
            (Err(storage), Err(reconcile)) => {
                warn!(error = %reconcile, "reconciliation failed before the upsert failed too");
                Err(storage)
            }
            (Err(storage), Ok(())) => Err(storage),
            (Ok(()), reconciliation) => reconciliation,
        }
    }

    async fn unassign(&self, mapping: &TenantMapping) -> Result<()> {
        let formation_id = mapping.formation_id;
        let application_id = mapping.application_id();
        let mappings = self.list(formation_id).await?;

        if let Some(stored) = mappings.get(&application_id) {
            if mappings.len() > 1 {
                if let Some(other) = counterpart(&mappings, application_id) {
                    let leaving = with_stored_configuration(mapping, stored);
                    self.update_applications_consumed_apis(&leaving, other).await?;
                }
            }
        } else {
            debug!("application not recorded in formation, nothing to reconcile");
        }

        self.repository
            .delete_tenant_mapping(formation_id, application_id)
            .await
            .context("failed to delete tenant mapping")
    }

    /// Reconcile the consumed APIs of both participants against each other.
    ///
    /// `mapping` is the incoming notification and decides the operation for
    /// both directions.
    async fn update_applications_consumed_apis(
        &self,
        mapping: &TenantMapping,
        counterpart: &TenantMapping,
    ) -> Result<()> {
        let operation = mapping.operation();
        let ias_host = mapping.ias_host();

        let application = self.get_application(ias_host, mapping).await?;
        let counterpart_application = self.get_application(ias_host, counterpart).await?;

        if operation == Operation::Assign {
            ensure_default_credential(mapping, &application)?;
            ensure_default_credential(counterpart, &counterpart_application)?;
        }

        if !mapping.consumed_apis().is_empty() {
            self.update_consumed_apis(
                ias_host,
                operation,
                mapping,
                application.clone(),
                counterpart_application.clone(),
            )
            .await?;
        }

        if !counterpart.consumed_apis().is_empty() {
            self.update_consumed_apis(
                ias_host,
                operation,
                counterpart,
                counterpart_application,
                application,
            )
            .await?;
        }

        Ok(())
    }

    async fn update_consumed_apis(
        &self,
        ias_host: &str,
        operation: Operation,
        consumer_mapping: &TenantMapping,
        consumer: Application,
        provider: Application,
    ) -> Result<()> {
        debug!(
            consumer = %consumer.id,
            provider = %provider.id,
            apis = ?consumer_mapping.consumed_apis(),
            "updating consumed APIs"
        );

        let data = UpdateConsumedApisData {
            ias_host: ias_host.to_string(),
            operation,
            requested_apis: consumer_mapping.consumed_apis().to_vec(),
            consumer,
            provider,
        };

        self.ias.update_application_consumed_apis(&data).await.with_context(|| {
            format!(
                "failed to update consumed APIs of application '{}'",
                consumer_mapping.application_id()
            )
        })
    }

    async fn get_application(&self, ias_host: &str, mapping: &TenantMapping) -> Result<Application> {
        self.ias.get_application(ias_host, mapping.client_id()).await.with_context(|| {
            format!("failed to get IAS application of application '{}'", mapping.application_id())
        })
    }

    async fn list(&self, formation_id: Uuid) -> Result<HashMap<Uuid, TenantMapping>> {
        self.repository
            .list_tenant_mappings(formation_id)
            .await
            .context("failed to list tenant mappings")
    }
}

#[async_trait]
impl TenantMappingProcessor for TenantMappingsService {
    async fn process_tenant_mapping(&self, mapping: &TenantMapping) -> Result<()> {
        self.process(mapping).await
    }
}

/// Pick the other participant of the formation.
///
/// Formations are two-party; with more rows the lowest application id wins so
/// the choice is stable across redeliveries.
fn counterpart(
    mappings: &HashMap<Uuid, TenantMapping>,
    application_id: Uuid,
) -> Option<&TenantMapping> {
    let mut others: Vec<_> = mappings.iter().filter(|(id, _)| **id != application_id).collect();
    if others.len() > 1 {
        warn!(participants = others.len() + 1, "formation has more than two participants");
    }
    others.sort_by_key(|(id, _)| **id);
    others.first().map(|(_, mapping)| *mapping)
}

/// Unassign notifications may arrive without configuration; fall back to
/// what was recorded on assign so the grants can still be revoked.
fn with_stored_configuration(mapping: &TenantMapping, stored: &TenantMapping) -> TenantMapping {
    let mut leaving = mapping.clone();
    if leaving.assigned_tenant.configuration.is_empty() {
        leaving.assigned_tenant.configuration = stored.assigned_tenant.configuration.clone();
    }
    leaving
}

fn ensure_default_credential(mapping: &TenantMapping, application: &Application) -> Result<()> {
    let is_s4 = mapping.assigned_tenant.ucl_application_type == S4_APPLICATION_TYPE;
    if is_s4 && application.authentication.api_certificates.is_empty() {
        return Err(IasAdapterError::MissingDefaultCredential(format!(
            "S4 application '{}' has no API certificate in IAS application '{}'",
            mapping.application_id(),
            application.id
        )));
    }
    Ok(())
}
