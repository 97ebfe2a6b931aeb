//! Server-rendered form components.

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use serde::Deserialize;

use flowgate_core::executor::Executor;
use flowgate_core::presentation::{executor_fields, BatchPresentation, SortOrder};
use flowgate_core::types::ExecutorId;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::render;
use crate::state::AppState;

fn default_field_name() -> String {
    "executor_id".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ExecutorSelectParams {
    /// `all` includes groups, `raw` is active actors only.
    #[serde(default = "ExecutorSelectParams::default_view")]
    pub view: String,
    /// Name attribute of the rendered `<select>`.
    #[serde(default = "default_field_name")]
    pub name: String,
    pub selected: Option<ExecutorId>,
}

impl ExecutorSelectParams {
    fn default_view() -> String {
        "all".to_string()
    }
}

/// GET /components/executor-select
///
/// An executor picker as an HTML `<select>` fragment, sorted by name.
/// Inactive actors never appear.
pub async fn executor_select(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ExecutorSelectParams>,
) -> AppResult<impl IntoResponse> {
    let include_groups = match params.view.as_str() {
        "all" => true,
        "raw" => false,
        other => {
            return Err(AppError::BadRequest(format!(
                "Unknown executor view '{other}'"
            )))
        }
    };

    let mut presentation = BatchPresentation::non_paged();
    presentation
        .set_fields_to_sort(vec![executor_fields::NAME], vec![SortOrder::Asc])
        .map_err(flowgate_core::error::CoreError::from)?;

    let executors: Vec<Executor> = state
        .executors
        .executors(&auth.user, &presentation)
        .await?
        .into_iter()
        .filter(|executor| match executor {
            Executor::Actor(actor) => actor.active,
            Executor::Group(_) => include_groups,
        })
        .collect();

    Ok(Html(render::executor_select(
        &params.name,
        &executors,
        params.selected,
    )))
}
