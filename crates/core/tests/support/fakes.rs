use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ias_adapter_core::{IasClient, StatusReporter, TenantMappingProcessor, TenantMappingRepository};
use ias_adapter_domain::{
    Application, ConsumedApis, IasAdapterError, Result as DomainResult, StatusReport,
    TenantMapping, UpdateConsumedApisData,
};
use uuid::Uuid;

// ============================================================================
// Ledger
// ============================================================================

/// In-memory ledger with optional failure injection.
#[derive(Default, Clone)]
pub struct FakeLedger {
    rows: Arc<Mutex<HashMap<(Uuid, Uuid), TenantMapping>>>,
    fail_upserts: Arc<Mutex<bool>>,
}

impl FakeLedger {
    pub fn fail_upserts(&self) {
        *self.fail_upserts.lock().unwrap() = true;
    }

    pub fn get(&self, formation_id: Uuid, application_id: Uuid) -> Option<TenantMapping> {
        self.rows.lock().unwrap().get(&(formation_id, application_id)).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl TenantMappingRepository for FakeLedger {
    async fn upsert_tenant_mapping(
        &self,
        formation_id: Uuid,
        application_id: Uuid,
        mapping: &TenantMapping,
    ) -> DomainResult<()> {
        if *self.fail_upserts.lock().unwrap() {
            return Err(IasAdapterError::Database("connection reset".into()));
        }
        self.rows.lock().unwrap().insert((formation_id, application_id), mapping.clone());
        Ok(())
    }

    async fn list_tenant_mappings(
        &self,
        formation_id: Uuid,
    ) -> DomainResult<HashMap<Uuid, TenantMapping>> {
        // Give concurrent notifications a chance to interleave.
        tokio::task::yield_now().await;

        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|((formation, _), _)| *formation == formation_id)
            .map(|((_, application), mapping)| (*application, mapping.clone()))
            .collect())
    }

    async fn delete_tenant_mapping(
        &self,
        formation_id: Uuid,
        application_id: Uuid,
    ) -> DomainResult<()> {
        self.rows.lock().unwrap().remove(&(formation_id, application_id));
        Ok(())
    }
}

// ============================================================================
// IAS
// ============================================================================

/// IAS fake keyed by client id that applies consumed API updates the same way
/// the HTTP client does and records the resulting patches.
#[derive(Default, Clone)]
pub struct FakeIas {
    applications: Arc<Mutex<HashMap<String, Vec<Application>>>>,
    updates: Arc<Mutex<Vec<UpdateConsumedApisData>>>,
    patches: Arc<Mutex<Vec<Application>>>,
    lookup_delay: Option<Duration>,
}

impl FakeIas {
    pub fn with_applications(applications: Vec<Application>) -> Self {
        let fake = Self::default();
        for application in applications {
            fake.insert(application);
        }
        fake
    }

    pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = Some(delay);
        self
    }

    pub fn insert(&self, application: Application) {
        self.applications
            .lock()
            .unwrap()
            .entry(application.authentication.client_id.clone())
            .or_default()
            .push(application);
    }

    pub fn application(&self, client_id: &str) -> Application {
        self.applications.lock().unwrap()[client_id][0].clone()
    }

    pub fn updates(&self) -> Vec<UpdateConsumedApisData> {
        self.updates.lock().unwrap().clone()
    }

    pub fn patches(&self) -> Vec<Application> {
        self.patches.lock().unwrap().clone()
    }
}

#[async_trait]
impl IasClient for FakeIas {
    async fn get_application(&self, _ias_host: &str, client_id: &str) -> DomainResult<Application> {
        if let Some(delay) = self.lookup_delay {
            tokio::time::sleep(delay).await;
        }

        let applications = self.applications.lock().unwrap();
        match applications.get(client_id).map(Vec::as_slice) {
            None | Some([]) => Err(IasAdapterError::IasApplicationNotFound(format!(
                "no IAS application with client id '{client_id}'"
            ))),
            Some([application]) => Ok(application.clone()),
            Some(_) => Err(IasAdapterError::AmbiguousIasApplication(format!(
                "more than one IAS application with client id '{client_id}'"
            ))),
        }
    }

    async fn update_application_consumed_apis(
        &self,
        data: &UpdateConsumedApisData,
    ) -> DomainResult<()> {
        self.updates.lock().unwrap().push(data.clone());

        let mut apis = ConsumedApis::new(data.consumer.authentication.consumed_apis.clone());
        let before = apis.len();
        apis.apply(data);
        if apis.len() == before {
            return Ok(());
        }

        let mut patched = data.consumer.clone();
        patched.authentication.consumed_apis = apis.into_vec();

        let mut applications = self.applications.lock().unwrap();
        if let Some(stored) = applications
            .get_mut(&patched.authentication.client_id)
            .and_then(|apps| apps.iter_mut().find(|app| app.id == patched.id))
        {
            *stored = patched.clone();
        }
        self.patches.lock().unwrap().push(patched);
        Ok(())
    }
}

// ============================================================================
// Status reporting
// ============================================================================

/// Records every reported status.
#[derive(Default, Clone)]
pub struct RecordingReporter {
    reports: Arc<Mutex<Vec<(String, StatusReport)>>>,
    fail: bool,
}

impl RecordingReporter {
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn reports(&self) -> Vec<(String, StatusReport)> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatusReporter for RecordingReporter {
    async fn report_status(&self, location: &str, report: &StatusReport) -> DomainResult<()> {
        self.reports.lock().unwrap().push((location.to_string(), report.clone()));
        if self.fail {
            return Err(IasAdapterError::Network("callback unreachable".into()));
        }
        Ok(())
    }
}

/// Processor returning a canned result and counting calls.
#[derive(Clone)]
pub struct StubProcessor {
    result: DomainResult<()>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl StubProcessor {
    pub fn returning(result: DomainResult<()>) -> Self {
        Self { result, delay: None, calls: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TenantMappingProcessor for StubProcessor {
    async fn process_tenant_mapping(&self, _mapping: &TenantMapping) -> DomainResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}
