//! Mapping of domain errors onto HTTP responses.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use ias_adapter_domain::constants::REQUEST_ID_HEADER;
use ias_adapter_domain::{IasAdapterError, Operation};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

/// A failed request together with the id it is answered under.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: IasAdapterError,
    pub request_id: String,
    /// Operation of the notification, once it is known.
    pub operation: Option<Operation>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(rename = "requestID")]
    request_id: String,
}

impl ApiError {
    pub fn new(error: IasAdapterError, request_id: impl Into<String>) -> Self {
        Self { error, request_id: request_id.into(), operation: None }
    }

    #[must_use]
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            IasAdapterError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            IasAdapterError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            IasAdapterError::Auth(_) => StatusCode::UNAUTHORIZED,
            IasAdapterError::IasApplicationNotFound(_)
                if self.operation == Some(Operation::Assign) =>
            {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(
                request_id = %self.request_id,
                error_type = self.error.label(),
                error = %self.error,
                "request failed"
            );
        } else {
            warn!(
                request_id = %self.request_id,
                error_type = self.error.label(),
                error = %self.error,
                status = status.as_u16(),
                "request rejected"
            );
        }

        let body = ErrorBody { error: self.error.to_string(), request_id: self.request_id };
        (status, Json(body)).into_response()
    }
}

/// Request id from `x-request-id`, or a fresh one.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_status_mapping() {
        let status = |error: IasAdapterError| ApiError::new(error, "r").status();

        assert_eq!(status(IasAdapterError::Validation("x".into())), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status(IasAdapterError::InvalidInput("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(IasAdapterError::Auth("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(IasAdapterError::AmbiguousIasApplication("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(IasAdapterError::MissingDefaultCredential("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_ias_application_depends_on_operation() {
        let err = || IasAdapterError::IasApplicationNotFound("c1".into());

        let assign = ApiError::new(err(), "r").with_operation(Operation::Assign);
        let unassign = ApiError::new(err(), "r").with_operation(Operation::Unassign);

        assert_eq!(assign.status(), StatusCode::NOT_FOUND);
        assert_eq!(unassign.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_request_id_prefers_header() {
        let mut headers = HeaderMap::new();
        assert!(Uuid::parse_str(&request_id(&headers)).is_ok());

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-42"));
        assert_eq!(request_id(&headers), "req-42");
    }
}
