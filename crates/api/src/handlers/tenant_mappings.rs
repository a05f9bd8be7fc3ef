//! Tenant mapping webhook
//!
//! `PATCH /v1/tenantMappings/{tenant_id}` carries one notification. With a
//! `Location` header the outcome is reported to that URL and the request is
//! answered with `202 Accepted`; without it the notification is processed
//! inline and the status code carries the outcome.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use ias_adapter_domain::{IasAdapterError, Result, TenantMapping, TenantMappingPayload};
use tracing::{info, info_span, warn, Instrument};

use crate::context::AppContext;
use crate::error::{request_id, ApiError};

pub async fn patch_tenant_mapping(
    State(context): State<Arc<AppContext>>,
    Path(tenant_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Response, ApiError> {
    let request_id = request_id(&headers);
    let mapping = parse_mapping(&body).map_err(|err| ApiError::new(err, request_id.clone()))?;
    let operation = mapping.operation();

    info!(
        %request_id,
        %tenant_id,
        formation_id = %mapping.formation_id,
        application_id = %mapping.application_id(),
        %operation,
        "received tenant mapping"
    );

    if let Some(location) = status_location(&headers) {
        let status = Arc::clone(&context.status);
        let span = info_span!("tenant_mapping_status", %request_id);

        context.tasks.spawn(
            async move {
                if let Err(err) = status.process(&mapping, &location).await {
                    warn!(error = %err, "tenant mapping outcome was not delivered");
                }
            }
            .instrument(span),
        );

        return Ok(StatusCode::ACCEPTED.into_response());
    }

    let timeout = context.processing_timeout();
    let result =
        match tokio::time::timeout(timeout, context.processor.process_tenant_mapping(&mapping))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(IasAdapterError::Internal(format!(
                "tenant mapping processing timed out after {}s",
                timeout.as_secs()
            ))),
        };
    result.map_err(|err| ApiError::new(err, request_id.clone()).with_operation(operation))?;

    info!(%request_id, %operation, "tenant mapping processed");
    Ok(StatusCode::OK.into_response())
}

/// Decode and validate a webhook body.
///
/// Undecodable JSON is `InvalidInput`; decodable but incomplete bodies fail
/// validation.
fn parse_mapping(body: &[u8]) -> Result<TenantMapping> {
    let payload: TenantMappingPayload = serde_json::from_slice(body).map_err(|err| {
        IasAdapterError::InvalidInput(format!("failed to decode tenant mapping: {err}"))
    })?;
    TenantMapping::try_from(payload)
}

fn status_location(headers: &HeaderMap) -> Option<String> {
    headers
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
