//! Handlers for process lifecycle and inspection.
//!
//! All endpoints require authentication via [`AuthUser`]; each one is a
//! delegation to the [`ExecutionService`] boundary.
//!
//! [`ExecutionService`]: flowgate_service::ExecutionService

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use flowgate_core::process::ProcessFilter;
use flowgate_core::types::{ExecutorId, ProcessId};
use flowgate_core::variable::VariableMap;

use crate::error::AppResult;
use crate::handlers::validate_payload;
use crate::middleware::auth::AuthUser;
use crate::query::{ProcessListParams, RecursiveParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct StartProcessRequest {
    #[validate(length(min = 1, message = "Definition name must not be empty"))]
    pub definition_name: String,
    #[serde(default)]
    pub variables: VariableMap,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpgradeProcessRequest {
    #[validate(range(min = 1, message = "Version must be positive"))]
    pub version: i64,
}

#[derive(Debug, Deserialize)]
pub struct AssignSwimlaneRequest {
    pub executor_id: ExecutorId,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /processes
///
/// Start a process by definition name with an initial variable map.
pub async fn start_process(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<StartProcessRequest>,
) -> AppResult<impl IntoResponse> {
    validate_payload(&input)?;

    let id = state
        .execution
        .start_process(&auth.user, &input.definition_name, input.variables)
        .await?;

    tracing::info!(
        process_id = id,
        definition = %input.definition_name,
        user = %auth.user.name,
        "Process started",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: id })))
}

/// POST /processes/{id}/cancel
pub async fn cancel_process(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProcessId>,
) -> AppResult<impl IntoResponse> {
    state.execution.cancel_process(&auth.user, id).await?;

    tracing::info!(process_id = id, user = %auth.user.name, "Process cancelled");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /processes/{id}/upgrade
///
/// Switch the process to another deployed definition version. The response
/// data is `false` when the process already runs that version.
pub async fn upgrade_process(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProcessId>,
    Json(input): Json<UpgradeProcessRequest>,
) -> AppResult<impl IntoResponse> {
    validate_payload(&input)?;

    let upgraded = state
        .execution
        .upgrade_process_to_definition_version(&auth.user, id, input.version)
        .await?;

    Ok(Json(DataResponse { data: upgraded }))
}

/// DELETE /processes
///
/// Remove every process matching the filter, including subprocesses.
pub async fn remove_processes(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(filter): Json<ProcessFilter>,
) -> AppResult<impl IntoResponse> {
    state.execution.remove_processes(&auth.user, &filter).await?;

    tracing::info!(user = %auth.user.name, "Processes removed");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Listing and lookup
// ---------------------------------------------------------------------------

/// GET /processes
pub async fn list_processes(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProcessListParams>,
) -> AppResult<impl IntoResponse> {
    let presentation = params.into_presentation(true)?;
    let processes = state.execution.processes(&auth.user, &presentation).await?;

    Ok(Json(DataResponse { data: processes }))
}

/// GET /processes/count
///
/// Number of processes matching the filters, ignoring paging.
pub async fn count_processes(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProcessListParams>,
) -> AppResult<impl IntoResponse> {
    let presentation = params.into_presentation(false)?;
    let count = state
        .execution
        .process_count(&auth.user, &presentation)
        .await?;

    Ok(Json(DataResponse { data: count }))
}

/// POST /processes/search
///
/// Exact-field search with a [`ProcessFilter`], unpaged.
pub async fn search_processes(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(filter): Json<ProcessFilter>,
) -> AppResult<impl IntoResponse> {
    let processes = state
        .execution
        .processes_by_filter(&auth.user, &filter)
        .await?;

    Ok(Json(DataResponse { data: processes }))
}

/// GET /processes/{id}
pub async fn get_process(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProcessId>,
) -> AppResult<impl IntoResponse> {
    let process = state.execution.process(&auth.user, id).await?;

    Ok(Json(DataResponse { data: process }))
}

/// GET /processes/{id}/parent
///
/// The direct parent; data is `null` for root processes.
pub async fn get_parent_process(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProcessId>,
) -> AppResult<impl IntoResponse> {
    let parent = state.execution.parent_process(&auth.user, id).await?;

    Ok(Json(DataResponse { data: parent }))
}

/// GET /processes/{id}/subprocesses
pub async fn get_subprocesses(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProcessId>,
    Query(params): Query<RecursiveParams>,
) -> AppResult<impl IntoResponse> {
    let subprocesses = state
        .execution
        .subprocesses(&auth.user, id, params.recursive)
        .await?;

    Ok(Json(DataResponse { data: subprocesses }))
}

/// GET /processes/{id}/jobs
pub async fn get_jobs(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProcessId>,
    Query(params): Query<RecursiveParams>,
) -> AppResult<impl IntoResponse> {
    let jobs = state
        .execution
        .process_jobs(&auth.user, id, params.recursive)
        .await?;

    Ok(Json(DataResponse { data: jobs }))
}

/// GET /processes/{id}/errors
pub async fn get_process_errors(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProcessId>,
) -> AppResult<impl IntoResponse> {
    let errors = state.execution.process_errors(&auth.user, id).await?;

    Ok(Json(DataResponse { data: errors }))
}

// ---------------------------------------------------------------------------
// Swimlanes
// ---------------------------------------------------------------------------

/// GET /processes/{id}/swimlanes
pub async fn get_swimlanes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProcessId>,
) -> AppResult<impl IntoResponse> {
    let swimlanes = state.execution.swimlanes(&auth.user, id).await?;

    Ok(Json(DataResponse { data: swimlanes }))
}

/// PUT /processes/{id}/swimlanes/{name}
///
/// Assign the named role to an executor. The executor is resolved first so
/// an unknown id fails with its own not-found error.
pub async fn assign_swimlane(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, name)): Path<(ProcessId, String)>,
    Json(input): Json<AssignSwimlaneRequest>,
) -> AppResult<impl IntoResponse> {
    let executor = state.executors.executor(&auth.user, input.executor_id).await?;

    state
        .execution
        .assign_swimlane(&auth.user, id, &name, executor)
        .await?;

    tracing::info!(
        process_id = id,
        swimlane = %name,
        executor_id = input.executor_id,
        "Swimlane assigned",
    );

    Ok(StatusCode::NO_CONTENT)
}
