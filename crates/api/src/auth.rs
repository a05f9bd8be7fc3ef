//! Bearer token check for the `/v1` routes.
//!
//! Token validation (signature, issuer, audience) belongs to a
//! [`TokenVerifier`]; the shipped [`BearerPresenceVerifier`] only requires a
//! non-empty bearer token and is meant to sit behind a gateway that already
//! verified it.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use ias_adapter_domain::{IasAdapterError, Result};

use crate::context::AppContext;
use crate::error::{request_id, ApiError};

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Accept or reject a raw bearer token.
    async fn verify(&self, token: &str) -> Result<()>;
}

/// Accepts any non-empty token.
pub struct BearerPresenceVerifier;

#[async_trait]
impl TokenVerifier for BearerPresenceVerifier {
    async fn verify(&self, token: &str) -> Result<()> {
        if token.trim().is_empty() {
            return Err(IasAdapterError::Auth("empty bearer token".into()));
        }
        Ok(())
    }
}

/// Reject requests without a verified `Authorization: Bearer` header.
pub async fn require_bearer(
    State(context): State<Arc<AppContext>>,
    request: Request,
    next: Next,
) -> std::result::Result<Response, ApiError> {
    let request_id = request_id(request.headers());

    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| {
            ApiError::new(
                IasAdapterError::Auth("missing bearer token".into()),
                request_id.clone(),
            )
        })?;

    context.token_verifier.verify(token).await.map_err(|err| ApiError::new(err, request_id))?;

    Ok(next.run(request).await)
}

/// Token of a `Bearer` credential; the scheme name is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim_start())
}
