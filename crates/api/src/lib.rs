//! # IAS Adapter API
//!
//! HTTP layer - routes, handlers and the main entry point.
//!
//! This crate contains:
//! - The axum router with the tenant mapping webhook and health checks
//! - Application context (dependency injection)
//! - Bearer token middleware
//! - Mapping of domain errors onto HTTP responses
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod auth;
pub mod context;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, patch};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

pub use context::AppContext;
pub use error::ApiError;

/// Build the application router.
pub fn router(context: Arc<AppContext>) -> Router {
    let v1 = Router::new()
        .route(
            "/v1/tenantMappings/{tenant_id}",
            patch(handlers::tenant_mappings::patch_tenant_mapping),
        )
        .route_layer(middleware::from_fn_with_state(Arc::clone(&context), auth::require_bearer));

    Router::new()
        .route("/healthz", get(handlers::health::healthz))
        .route("/readyz", get(handlers::health::readyz))
        .merge(v1)
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}
