//! Route definitions for process lifecycle, inspection, variables, and
//! diagrams, mounted at `/processes`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{diagram, processes, variables};
use crate::state::AppState;

/// ```text
/// POST   /                                   -> start_process
/// GET    /                                   -> list_processes
/// GET    /count                              -> count_processes
/// POST   /search                             -> search_processes
/// DELETE /                                   -> remove_processes
/// GET    /{id}                               -> get_process
/// GET    /{id}/parent                        -> get_parent_process
/// GET    /{id}/subprocesses                  -> get_subprocesses
/// POST   /{id}/cancel                        -> cancel_process
/// POST   /{id}/upgrade                       -> upgrade_process
/// GET    /{id}/swimlanes                     -> get_swimlanes
/// PUT    /{id}/swimlanes/{name}              -> assign_swimlane
/// GET    /{id}/variables                     -> list_variables
/// PUT    /{id}/variables                     -> update_variables
/// GET    /{id}/variables/{name}              -> get_variable
/// GET    /{id}/variables/{name}/file         -> get_file_variable
/// GET    /{id}/tasks/{task_id}/variables/{name} -> get_task_variable
/// GET    /{id}/diagram                       -> get_diagram (image/png)
/// GET    /{id}/diagram/elements              -> get_diagram_elements
/// GET    /{id}/diagram/elements/{node_id}    -> get_diagram_element
/// GET    /{id}/jobs                          -> get_jobs
/// GET    /{id}/errors                        -> get_process_errors
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(processes::start_process)
                .get(processes::list_processes)
                .delete(processes::remove_processes),
        )
        .route("/count", get(processes::count_processes))
        .route("/search", post(processes::search_processes))
        .route("/{id}", get(processes::get_process))
        .route("/{id}/parent", get(processes::get_parent_process))
        .route("/{id}/subprocesses", get(processes::get_subprocesses))
        .route("/{id}/cancel", post(processes::cancel_process))
        .route("/{id}/upgrade", post(processes::upgrade_process))
        .route("/{id}/swimlanes", get(processes::get_swimlanes))
        .route("/{id}/swimlanes/{name}", put(processes::assign_swimlane))
        .route(
            "/{id}/variables",
            get(variables::list_variables).put(variables::update_variables),
        )
        .route("/{id}/variables/{name}", get(variables::get_variable))
        .route(
            "/{id}/variables/{name}/file",
            get(variables::get_file_variable),
        )
        .route(
            "/{id}/tasks/{task_id}/variables/{name}",
            get(variables::get_task_variable),
        )
        .route("/{id}/diagram", get(diagram::get_diagram))
        .route("/{id}/diagram/elements", get(diagram::get_diagram_elements))
        .route(
            "/{id}/diagram/elements/{node_id}",
            get(diagram::get_diagram_element),
        )
        .route("/{id}/jobs", get(processes::get_jobs))
        .route("/{id}/errors", get(processes::get_process_errors))
}
