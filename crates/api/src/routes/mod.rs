pub mod components;
pub mod executors;
pub mod health;
pub mod processes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree. Health is mounted separately at root
/// level by the caller.
///
/// Route hierarchy:
///
/// ```text
/// /processes                                 start, list, bulk remove
/// /processes/count                           filtered count
/// /processes/search                          exact-field search
/// /processes/{id}                            single process
/// /processes/{id}/parent                     direct parent
/// /processes/{id}/subprocesses               children or subtree
/// /processes/{id}/cancel                     cancel (POST)
/// /processes/{id}/upgrade                    definition version switch (POST)
/// /processes/{id}/swimlanes                  roles; assignment under /{name}
/// /processes/{id}/variables                  read, update; /{name}, /{name}/file
/// /processes/{id}/tasks/{task_id}/variables/{name}  task-scoped read
/// /processes/{id}/diagram                    PNG; /elements, /elements/{node_id}
/// /processes/{id}/jobs                       active jobs
/// /processes/{id}/errors                     recorded node failures
///
/// /executors                                 list; /{id}, /{id}/status
///
/// /components/executor-select                HTML picker fragment
/// /views/processes                           HTML process table
/// ```
///
/// Every route here requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/processes", processes::router())
        .nest("/executors", executors::router())
        .nest("/components", components::router())
        .nest("/views", components::views_router())
}
