//! Handlers for the process diagram and its graph elements.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use flowgate_core::types::{ProcessId, TaskId};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DiagramParams {
    pub task_id: Option<TaskId>,
    pub child_process_id: Option<ProcessId>,
    pub subprocess_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ElementsParams {
    pub subprocess_id: Option<String>,
}

/// GET /processes/{id}/diagram
///
/// The diagram rendered as PNG, with the requested task, child process,
/// and embedded subprocess highlighted.
pub async fn get_diagram(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProcessId>,
    Query(params): Query<DiagramParams>,
) -> AppResult<impl IntoResponse> {
    let png = state
        .execution
        .process_diagram(
            &auth.user,
            id,
            params.task_id,
            params.child_process_id,
            params.subprocess_id.as_deref(),
        )
        .await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// GET /processes/{id}/diagram/elements
pub async fn get_diagram_elements(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProcessId>,
    Query(params): Query<ElementsParams>,
) -> AppResult<impl IntoResponse> {
    let elements = state
        .execution
        .process_diagram_elements(&auth.user, id, params.subprocess_id.as_deref())
        .await?;

    Ok(Json(DataResponse { data: elements }))
}

/// GET /processes/{id}/diagram/elements/{node_id}
pub async fn get_diagram_element(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, node_id)): Path<(ProcessId, String)>,
) -> AppResult<impl IntoResponse> {
    let element = state
        .execution
        .process_diagram_element(&auth.user, id, &node_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Node '{node_id}' is not on the diagram")))?;

    Ok(Json(DataResponse { data: element }))
}
