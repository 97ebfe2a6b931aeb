use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use flowgate_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses;
/// the `details` field carries the structured payload remote clients need
/// to reconstruct the typed error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from the engine boundary.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A missing resource that is not a process/definition/executor.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::ProcessNotFound { id } => (
                    StatusCode::NOT_FOUND,
                    "PROCESS_NOT_FOUND",
                    core.to_string(),
                    Some(json!({ "id": id })),
                ),
                CoreError::DefinitionNotFound { name } => (
                    StatusCode::NOT_FOUND,
                    "DEFINITION_NOT_FOUND",
                    core.to_string(),
                    Some(json!({ "name": name })),
                ),
                CoreError::ExecutorNotFound { id } => (
                    StatusCode::NOT_FOUND,
                    "EXECUTOR_NOT_FOUND",
                    core.to_string(),
                    Some(json!({ "id": id })),
                ),
                CoreError::ParentProcessExists { id, parent_id } => (
                    StatusCode::CONFLICT,
                    "PARENT_PROCESS_EXISTS",
                    core.to_string(),
                    Some(json!({ "id": id, "parent_id": parent_id })),
                ),
                CoreError::Validation(errors) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    core.to_string(),
                    serde_json::to_value(errors).ok(),
                ),
                CoreError::Filter(_) => (
                    StatusCode::BAD_REQUEST,
                    "FILTER_FORMAT_ERROR",
                    core.to_string(),
                    None,
                ),
                CoreError::Presentation(_) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_PRESENTATION",
                    core.to_string(),
                    None,
                ),
                CoreError::Unauthorized(msg) => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    msg.clone(),
                    None,
                ),
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None)
                }
                CoreError::Engine(msg) => {
                    tracing::error!(error = %msg, "Engine unreachable");
                    (
                        StatusCode::BAD_GATEWAY,
                        "ENGINE_UNAVAILABLE",
                        "The workflow engine is unavailable".to_string(),
                        None,
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                        None,
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json::<Value>(body)).into_response()
    }
}
