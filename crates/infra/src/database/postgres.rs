//! Postgres-backed tenant mapping ledger.
//!
//! One row per `(formation_id, ucl_application_id)` holding the latest
//! notification as JSONB in its wire representation. Connections come from a
//! `deadpool-postgres` pool; a connection is verified before it is handed out
//! again, so dropped server connections are replaced instead of failing
//! every later call.

use std::collections::HashMap;

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use ias_adapter_core::TenantMappingRepository;
use ias_adapter_domain::{
    DatabaseConfig, IasAdapterError, Result as DomainResult, ResultExt, TenantMapping,
};
use tokio_postgres::types::Json;
use tokio_postgres::NoTls;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::InfraError;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS tenant_mappings (
    formation_id TEXT NOT NULL,
    ucl_application_id TEXT NOT NULL,
    value JSONB NOT NULL,
    PRIMARY KEY (formation_id, ucl_application_id)
)";

const UPSERT: &str = "INSERT INTO tenant_mappings (formation_id, ucl_application_id, value)
    VALUES ($1, $2, $3)
    ON CONFLICT (formation_id, ucl_application_id) DO UPDATE SET
        value = excluded.value";

const SELECT_BY_FORMATION: &str =
    "SELECT ucl_application_id, value FROM tenant_mappings WHERE formation_id = $1";

const DELETE: &str =
    "DELETE FROM tenant_mappings WHERE formation_id = $1 AND ucl_application_id = $2";

/// Ledger stored in the `tenant_mappings` table.
#[derive(Clone)]
pub struct PostgresTenantMappingRepository {
    pool: Pool,
}

impl PostgresTenantMappingRepository {
    /// Wrap an already built pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Build a pool for `config.url` and check out one connection to fail
    /// fast on an unreachable database.
    pub async fn connect(config: &DatabaseConfig) -> DomainResult<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| IasAdapterError::Config("database url is not configured".into()))?;

        let pg_config: tokio_postgres::Config = url
            .parse()
            .map_err(|err| IasAdapterError::Config(format!("invalid database url: {err}")))?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig { recycling_method: RecyclingMethod::Verified },
        );
        let pool = Pool::builder(manager)
            .max_size(config.pool_size.max(1))
            .build()
            .map_err(|err| IasAdapterError::Config(format!("invalid database pool: {err}")))?;

        let repository = Self::new(pool);
        repository.client().await.context("failed to connect to postgres")?;

        info!(max_connections = config.pool_size.max(1), "postgres pool initialised");
        Ok(repository)
    }

    /// Create the ledger table if it does not exist yet.
    pub async fn ensure_schema(&self) -> DomainResult<()> {
        self.client()
            .await?
            .batch_execute(CREATE_TABLE)
            .await
            .map_err(map_pg_error)
            .context("failed to create tenant_mappings table")
    }

    async fn client(&self) -> DomainResult<Object> {
        self.pool.get().await.map_err(|err| InfraError::from(err).into())
    }
}

#[async_trait]
impl TenantMappingRepository for PostgresTenantMappingRepository {
    async fn upsert_tenant_mapping(
        &self,
        formation_id: Uuid,
        application_id: Uuid,
        mapping: &TenantMapping,
    ) -> DomainResult<()> {
        let formation_key = formation_id.to_string();
        let application_key = application_id.to_string();

        self.client()
            .await?
            .execute(UPSERT, &[&formation_key, &application_key, &Json(mapping)])
            .await
            .map_err(map_pg_error)?;

        debug!(%formation_id, %application_id, "upserted tenant mapping");
        Ok(())
    }

    async fn list_tenant_mappings(
        &self,
        formation_id: Uuid,
    ) -> DomainResult<HashMap<Uuid, TenantMapping>> {
        let formation_key = formation_id.to_string();
        let rows = self
            .client()
            .await?
            .query(SELECT_BY_FORMATION, &[&formation_key])
            .await
            .map_err(map_pg_error)?;

        rows.iter()
            .map(|row| -> DomainResult<(Uuid, TenantMapping)> {
                let key: String = row.try_get(0).map_err(map_pg_error)?;
                let Json(value): Json<serde_json::Value> = row.try_get(1).map_err(map_pg_error)?;

                let application_id = Uuid::parse_str(&key).map_err(|err| {
                    IasAdapterError::Database(format!("invalid application id '{key}': {err}"))
                })?;
                let mapping: TenantMapping = serde_json::from_value(value)
                    .map_err(IasAdapterError::from)
                    .with_context(|| format!("invalid stored tenant mapping '{key}'"))?;

                Ok((application_id, mapping))
            })
            .collect()
    }

    async fn delete_tenant_mapping(
        &self,
        formation_id: Uuid,
        application_id: Uuid,
    ) -> DomainResult<()> {
        let formation_key = formation_id.to_string();
        let application_key = application_id.to_string();

        let deleted = self
            .client()
            .await?
            .execute(DELETE, &[&formation_key, &application_key])
            .await
            .map_err(map_pg_error)?;

        debug!(%formation_id, %application_id, deleted, "deleted tenant mapping");
        Ok(())
    }

    async fn ping(&self) -> DomainResult<()> {
        self.client()
            .await
            .context("postgres ping failed")?
            .simple_query("SELECT 1")
            .await
            .map(|_| ())
            .map_err(map_pg_error)
            .context("postgres ping failed")
    }
}

fn map_pg_error(err: tokio_postgres::Error) -> IasAdapterError {
    InfraError::from(err).into()
}
