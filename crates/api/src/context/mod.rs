//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use ias_adapter_core::{
    IasClient, StatusProcessor, StatusReporter, TenantMappingProcessor, TenantMappingRepository,
    TenantMappingsService,
};
use ias_adapter_domain::{Config, Result, ResultExt};
use ias_adapter_infra::{
    HttpStatusReporter, IasRestClient, InMemoryTenantMappingRepository,
    PostgresTenantMappingRepository,
};
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use crate::auth::{BearerPresenceVerifier, TokenVerifier};

/// Everything a request handler needs, shared across requests.
pub struct AppContext {
    pub config: Config,
    pub repository: Arc<dyn TenantMappingRepository>,
    pub processor: Arc<dyn TenantMappingProcessor>,
    pub status: Arc<StatusProcessor>,
    pub token_verifier: Arc<dyn TokenVerifier>,
    /// Notifications still being processed after their 202 response.
    pub tasks: TaskTracker,
}

impl AppContext {
    /// Wire the production adapters described by `config`.
    ///
    /// Uses the Postgres ledger when a database URL is configured and the
    /// in-memory ledger otherwise.
    pub async fn new(config: Config) -> Result<Self> {
        let repository: Arc<dyn TenantMappingRepository> = match &config.database.url {
            Some(_) => {
                let postgres = PostgresTenantMappingRepository::connect(&config.database).await?;
                postgres.ensure_schema().await?;
                info!("using postgres tenant mapping ledger");
                Arc::new(postgres)
            }
            None => {
                warn!("no database configured, tenant mappings are kept in memory");
                Arc::new(InMemoryTenantMappingRepository::new())
            }
        };

        let ias: Arc<dyn IasClient> = Arc::new(
            IasRestClient::from_config(&config.ias).context("failed to create IAS client")?,
        );
        let reporter: Arc<dyn StatusReporter> = Arc::new(
            HttpStatusReporter::from_config(&config.ucl)
                .context("failed to create status reporter")?,
        );

        Ok(Self::from_parts(config, repository, ias, reporter, Arc::new(BearerPresenceVerifier)))
    }

    /// Assemble a context from already built adapters.
    pub fn from_parts(
        config: Config,
        repository: Arc<dyn TenantMappingRepository>,
        ias: Arc<dyn IasClient>,
        reporter: Arc<dyn StatusReporter>,
        token_verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        let processor: Arc<dyn TenantMappingProcessor> =
            Arc::new(TenantMappingsService::new(Arc::clone(&repository), ias));
        let status = StatusProcessor::new(Arc::clone(&processor), reporter)
            .with_timeout(Duration::from_secs(config.processing.timeout_secs));

        Self {
            config,
            repository,
            processor,
            status: Arc::new(status),
            token_verifier,
            tasks: TaskTracker::new(),
        }
    }

    /// Upper bound for handling one notification.
    pub fn processing_timeout(&self) -> Duration {
        Duration::from_secs(self.config.processing.timeout_secs)
    }

    /// Stop accepting background work and wait for what is in flight.
    pub async fn drain_background_tasks(&self) {
        self.tasks.close();
        if !self.tasks.is_empty() {
            info!(pending = self.tasks.len(), "waiting for background tasks");
        }
        self.tasks.wait().await;
    }
}
