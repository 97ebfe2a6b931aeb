//! Route definitions for server-rendered fragments.
//!
//! Two routers are provided:
//! - `router()` for form components mounted at `/components`
//! - `views_router()` for full list views mounted at `/views`

use axum::routing::get;
use axum::Router;

use crate::handlers::{components, views};
use crate::state::AppState;

/// ```text
/// GET /executor-select  -> executor_select (HTML fragment)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/executor-select", get(components::executor_select))
}

/// ```text
/// GET /processes  -> processes_view (HTML table)
/// ```
pub fn views_router() -> Router<AppState> {
    Router::new().route("/processes", get(views::processes_view))
}
