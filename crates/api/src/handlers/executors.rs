//! Handlers for executor lookup and actor status administration.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use flowgate_core::types::ExecutorId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::ExecutorListParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub active: bool,
}

/// GET /executors
pub async fn list_executors(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ExecutorListParams>,
) -> AppResult<impl IntoResponse> {
    let presentation = params.into_presentation()?;
    let executors = state.executors.executors(&auth.user, &presentation).await?;

    Ok(Json(DataResponse { data: executors }))
}

/// GET /executors/{id}
pub async fn get_executor(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ExecutorId>,
) -> AppResult<impl IntoResponse> {
    let executor = state.executors.executor(&auth.user, id).await?;

    Ok(Json(DataResponse { data: executor }))
}

/// POST /executors/{id}/status
///
/// Activate or deactivate an actor. Groups are rejected with a validation
/// error.
pub async fn set_executor_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ExecutorId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .executors
        .set_status(&auth.user, id, input.active)
        .await?;

    tracing::info!(
        executor_id = id,
        active = input.active,
        user = %auth.user.name,
        "Actor status changed",
    );

    Ok(StatusCode::NO_CONTENT)
}
