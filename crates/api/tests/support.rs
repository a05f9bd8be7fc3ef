//! Shared helpers for router tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use ias_adapter::auth::BearerPresenceVerifier;
use ias_adapter::{router, AppContext};
use ias_adapter_core::TenantMappingRepository;
use ias_adapter_domain::{Config, IasAdapterError, Result, TenantMapping};
use ias_adapter_infra::{HttpStatusReporter, IasRestClient, InMemoryTenantMappingRepository};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

pub const TOKEN: &str = "Bearer test-token";
pub const FORMATION_ID: &str = "6f6a3b58-4d5c-4b8e-9c55-0b9a1a7f3e10";
pub const FIRST_APP: &str = "0d2d7f3e-6b8b-4d0e-8a53-3f1e4a5b6c7d";
pub const SECOND_APP: &str = "9a1b2c3d-4e5f-4a6b-8c7d-0e1f2a3b4c5d";

/// Router backed by the in-memory ledger and the real HTTP adapters.
pub fn app() -> Router {
    app_with_repository(Arc::new(InMemoryTenantMappingRepository::new()))
}

pub fn app_with_repository(repository: Arc<dyn TenantMappingRepository>) -> Router {
    router(context_with_repository(repository))
}

/// Context behind [`app`], for tests that inspect it after a request.
pub fn context() -> Arc<AppContext> {
    context_with_repository(Arc::new(InMemoryTenantMappingRepository::new()))
}

fn context_with_repository(repository: Arc<dyn TenantMappingRepository>) -> Arc<AppContext> {
    let config = Config::default();
    let ias = IasRestClient::from_config(&config.ias).expect("ias client");
    let reporter = HttpStatusReporter::from_config(&config.ucl).expect("status reporter");

    let context = AppContext::from_parts(
        config,
        repository,
        Arc::new(ias),
        Arc::new(reporter),
        Arc::new(BearerPresenceVerifier),
    );
    Arc::new(context)
}

/// Webhook body for one participant of the test formation.
pub fn tenant_mapping(
    ias_host: &str,
    application_id: &str,
    client_id: &str,
    operation: &str,
) -> Value {
    json!({
        "formationId": FORMATION_ID,
        "receiverTenant": { "applicationUrl": ias_host },
        "assignedTenants": [{
            "uclApplicationId": application_id,
            "uclApplicationType": "SAP Business Network",
            "localTenantId": "local",
            "operation": operation,
            "parameters": { "technicalIntegrationId": client_id },
            "reverseAssignmentState": "INITIAL",
            "configuration": { "consumedApis": ["inventory"] }
        }]
    })
}

/// `PATCH` of the webhook with a bearer token and `extra` headers.
pub fn webhook(body: impl Into<Body>, extra: &[(&str, &str)]) -> Request<Body> {
    webhook_with_authorization(body, TOKEN, extra)
}

pub fn webhook_with_authorization(
    body: impl Into<Body>,
    authorization: &str,
    extra: &[(&str, &str)],
) -> Request<Body> {
    let mut builder = Request::builder()
        .method("PATCH")
        .uri(format!("/v1/tenantMappings/{FORMATION_ID}"))
        .header("content-type", "application/json")
        .header("authorization", authorization);
    for (name, value) in extra {
        builder = builder.header(*name, *value);
    }
    builder.body(body.into()).expect("request")
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("router is infallible")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.expect("body").to_vec()
}

/// Ledger whose backing store is unreachable.
pub struct UnreachableRepository;

#[async_trait]
impl TenantMappingRepository for UnreachableRepository {
    async fn upsert_tenant_mapping(&self, _: Uuid, _: Uuid, _: &TenantMapping) -> Result<()> {
        Err(unreachable_database())
    }

    async fn list_tenant_mappings(&self, _: Uuid) -> Result<HashMap<Uuid, TenantMapping>> {
        Err(unreachable_database())
    }

    async fn delete_tenant_mapping(&self, _: Uuid, _: Uuid) -> Result<()> {
        Err(unreachable_database())
    }

    async fn ping(&self) -> Result<()> {
        Err(unreachable_database())
    }
}

fn unreachable_database() -> IasAdapterError {
    IasAdapterError::Database("connection refused".into())
}
