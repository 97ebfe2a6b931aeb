//! Route definitions for executor lookup and administration, mounted at
//! `/executors`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::executors;
use crate::state::AppState;

/// ```text
/// GET    /             -> list_executors
/// GET    /{id}         -> get_executor
/// POST   /{id}/status  -> set_executor_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(executors::list_executors))
        .route("/{id}", get(executors::get_executor))
        .route("/{id}/status", post(executors::set_executor_status))
}
