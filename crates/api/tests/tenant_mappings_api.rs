//! Router tests for the tenant mapping webhook and the health checks.

mod support;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use support::*;
use wiremock::matchers::{body_json as json_body, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATUS_PATH: &str = "/v1/formations/f1/assignments/a1/status";

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_healthz_needs_no_token() {
    let response = send(&app(), Request::get("/healthz").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readyz_with_reachable_ledger() {
    let response = send(&app(), Request::get("/readyz").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readyz_with_unreachable_ledger() {
    let app = app_with_repository(Arc::new(UnreachableRepository));

    let response = send(&app, Request::get("/readyz").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["status"], "unavailable");
}

// ============================================================================
// Request handling
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let request = Request::patch(format!("/v1/tenantMappings/{FORMATION_ID}"))
        .header("x-request-id", "req-1")
        .body(Body::from("{}"))
        .unwrap();

    let response = send(&app(), request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["requestID"], "req-1");
}

#[tokio::test]
async fn test_lowercase_bearer_scheme_is_accepted() {
    let ias = MockServer::start().await;
    let body = tenant_mapping(&ias.uri(), FIRST_APP, "c1", "assign");

    let response =
        send(&app(), webhook_with_authorization(body.to_string(), "bearer test-token", &[])).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_other_authorization_scheme_is_unauthorized() {
    let response = send(&app(), webhook_with_authorization("{}", "Basic dXNlcjpwYXNz", &[])).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_undecodable_body_is_bad_request() {
    let response = send(&app(), webhook("{\"formationId\": ", &[])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("invalid input"));
    assert!(body["requestID"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_incomplete_body_is_unprocessable() {
    let body = json!({ "formationId": "not-a-uuid", "assignedTenants": [] });

    let response =
        send(&app(), webhook(body.to_string(), &[("x-request-id", "req-422")])).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["requestID"], "req-422");
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("formationId"));
    assert!(error.contains("assignedTenants"));
}

#[tokio::test]
async fn test_first_participant_is_recorded_without_ias_calls() {
    let ias = MockServer::start().await;
    let body = tenant_mapping(&ias.uri(), FIRST_APP, "c1", "assign");

    let response = send(&app(), webhook(body.to_string(), &[])).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());
    assert!(ias.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_missing_ias_application_on_assign_is_not_found() {
    let ias = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Applications/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "applications": [] })))
        .mount(&ias)
        .await;
    let app = app();

    let first = tenant_mapping(&ias.uri(), FIRST_APP, "c1", "assign");
    assert_eq!(send(&app, webhook(first.to_string(), &[])).await.status(), StatusCode::OK);

    let second = tenant_mapping(&ias.uri(), SECOND_APP, "c2", "assign");
    let response = send(&app, webhook(second.to_string(), &[])).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].as_str().unwrap().contains("IAS application"));
}

#[tokio::test]
async fn test_unassign_of_unknown_participant_succeeds() {
    let ias = MockServer::start().await;
    let body = tenant_mapping(&ias.uri(), FIRST_APP, "c1", "unassign");

    let response = send(&app(), webhook(body.to_string(), &[])).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let app = app_with_repository(Arc::new(UnreachableRepository));
    let body = tenant_mapping("tenant.accounts.ondemand.com", FIRST_APP, "c1", "assign");

    let response = send(&app, webhook(body.to_string(), &[])).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["error"].as_str().unwrap().contains("database error"));
}

// ============================================================================
// Asynchronous mode
// ============================================================================

#[tokio::test]
async fn test_location_header_reports_outcome_to_callback() {
    let ias = MockServer::start().await;
    let ucl = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(STATUS_PATH))
        .and(json_body(json!({ "state": "CREATE_READY" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ucl)
        .await;

    let body = tenant_mapping(&ias.uri(), FIRST_APP, "c1", "assign");
    let location = format!("{}{STATUS_PATH}", ucl.uri());

    let response = send(&app(), webhook(body.to_string(), &[("location", location.as_str())])).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    wait_for_requests(&ucl, 1).await;
}

#[tokio::test]
async fn test_shutdown_drain_waits_for_pending_callback() {
    let ias = MockServer::start().await;
    let ucl = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&ucl)
        .await;

    let context = context();
    let app = ias_adapter::router(Arc::clone(&context));
    let body = tenant_mapping(&ias.uri(), FIRST_APP, "c1", "assign");
    let location = format!("{}{STATUS_PATH}", ucl.uri());

    let request = webhook(body.to_string(), &[("location", location.as_str())]);
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    context.drain_background_tasks().await;

    assert!(context.tasks.is_empty());
    assert_eq!(ucl.received_requests().await.unwrap_or_default().len(), 1);
}

#[tokio::test]
async fn test_location_header_still_validates_synchronously() {
    let ucl = MockServer::start().await;
    let location = format!("{}{STATUS_PATH}", ucl.uri());

    let response = send(&app(), webhook("{}", &[("location", location.as_str())])).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(ucl.received_requests().await.unwrap_or_default().is_empty());
}

async fn wait_for_requests(server: &MockServer, expected: usize) {
    for _ in 0..100 {
        if server.received_requests().await.unwrap_or_default().len() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("expected {expected} callback request(s)");
}
