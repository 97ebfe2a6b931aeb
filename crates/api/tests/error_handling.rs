//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each error variant produces the correct HTTP
//! status code, error code, and details payload. They do NOT need an HTTP
//! server -- they call `IntoResponse` directly on `AppError` values.

use axum::response::IntoResponse;
use http_body_util::BodyExt;

use flowgate_api::error::AppError;
use flowgate_core::error::{CoreError, ValidationErrors};

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn process_not_found_returns_404_with_id() {
    let err = AppError::Core(CoreError::ProcessNotFound { id: 42 });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "PROCESS_NOT_FOUND");
    assert_eq!(json["details"]["id"], 42);
}

#[tokio::test]
async fn definition_not_found_returns_404_with_name() {
    let err = AppError::Core(CoreError::DefinitionNotFound {
        name: "payment".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "DEFINITION_NOT_FOUND");
    assert_eq!(json["details"]["name"], "payment");
}

#[tokio::test]
async fn parent_process_exists_returns_409() {
    let err = AppError::Core(CoreError::ParentProcessExists { id: 5, parent_id: 3 });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "PARENT_PROCESS_EXISTS");
    assert_eq!(json["details"]["id"], 5);
    assert_eq!(json["details"]["parent_id"], 3);
}

#[tokio::test]
async fn validation_error_carries_field_messages() {
    let mut errors = ValidationErrors::default();
    errors.add_field("amount", "is required");
    let err = AppError::Core(CoreError::Validation(errors));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["details"]["fields"]["amount"][0], "is required");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("no token provided".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn engine_failure_returns_502_without_transport_details() {
    let err = AppError::Core(CoreError::Engine(
        "connection refused (10.0.0.3:8080)".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "ENGINE_UNAVAILABLE");
    assert!(!json.to_string().contains("10.0.0.3"));
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret engine credentials leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");

    // The response body must NOT contain the original error details.
    let body_text = json.to_string();
    assert!(
        !body_text.contains("secret"),
        "Internal error response must not leak sensitive details"
    );
    assert_eq!(json["error"], "An internal error occurred");
}
