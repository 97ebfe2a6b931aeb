//! Server-rendered list views.

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::ProcessListParams;
use crate::render;
use crate::state::AppState;

/// GET /views/processes
///
/// The process list as an HTML table, honoring the same filter, sort, and
/// paging parameters as `GET /processes`.
pub async fn processes_view(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProcessListParams>,
) -> AppResult<impl IntoResponse> {
    let presentation = params.into_presentation(true)?;
    let processes = state.execution.processes(&auth.user, &presentation).await?;

    Ok(Html(render::process_table(&processes)))
}
