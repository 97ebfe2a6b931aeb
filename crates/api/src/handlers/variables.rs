//! Handlers for process variable reads and updates.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use flowgate_core::types::{ProcessId, TaskId};
use flowgate_core::variable::VariableMap;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /processes/{id}/variables
///
/// All variables of the process, declared-but-unset ones included with a
/// `null` value.
pub async fn list_variables(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProcessId>,
) -> AppResult<impl IntoResponse> {
    let variables = state.execution.variables(&auth.user, id).await?;

    Ok(Json(DataResponse { data: variables }))
}

/// PUT /processes/{id}/variables
///
/// Update variables without signalling the process.
pub async fn update_variables(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProcessId>,
    Json(variables): Json<VariableMap>,
) -> AppResult<impl IntoResponse> {
    state
        .execution
        .update_variables(&auth.user, id, variables)
        .await?;

    tracing::info!(process_id = id, user = %auth.user.name, "Variables updated");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /processes/{id}/variables/{name}
pub async fn get_variable(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, name)): Path<(ProcessId, String)>,
) -> AppResult<impl IntoResponse> {
    let variable = state
        .execution
        .variable(&auth.user, id, &name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Variable '{name}' is not defined")))?;

    Ok(Json(DataResponse { data: variable }))
}

/// GET /processes/{id}/tasks/{task_id}/variables/{name}
///
/// Variable in the scope of a task; falls back to the process scope.
pub async fn get_task_variable(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, task_id, name)): Path<(ProcessId, TaskId, String)>,
) -> AppResult<impl IntoResponse> {
    let variable = state
        .execution
        .task_variable(&auth.user, id, task_id, &name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Variable '{name}' is not defined")))?;

    Ok(Json(DataResponse { data: variable }))
}

/// GET /processes/{id}/variables/{name}/file
///
/// Raw payload of a file-typed variable with its stored content type.
pub async fn get_file_variable(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, name)): Path<(ProcessId, String)>,
) -> AppResult<impl IntoResponse> {
    let file = state
        .execution
        .file_variable_value(&auth.user, id, &name)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Variable '{name}' holds no file value"))
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.name),
            ),
        ],
        file.data,
    ))
}
