//! Reqwest client implementing the service boundary against a remote
//! engine's REST surface.
//!
//! The gateway authenticates callers itself and forwards the acting user
//! as trusted `X-User-Id` / `X-User-Name` headers. Engine errors come back
//! as `{ "error", "code", "details" }` envelopes; `details` carries the
//! structured payload (offending id, validation messages) needed to
//! reconstruct the typed [`CoreError`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use flowgate_core::error::{CoreError, CoreResult, ValidationErrors};
use flowgate_core::executor::{Executor, User};
use flowgate_core::graph::NodeGraphElement;
use flowgate_core::job::WfJob;
use flowgate_core::presentation::BatchPresentation;
use flowgate_core::process::{ProcessError, ProcessFilter, WfProcess};
use flowgate_core::swimlane::WfSwimlane;
use flowgate_core::types::{ExecutorId, ProcessId, TaskId};
use flowgate_core::variable::{FileVariable, VariableMap, WfVariable};

use crate::execution::ExecutionService;
use crate::executors::ExecutorService;

/// HTTP client for a remote workflow engine.
pub struct RemoteEngine {
    http: reqwest::Client,
    base_url: String,
}

/// Standard `{ "data": T }` success envelope of the engine API.
#[derive(Debug, Deserialize)]
struct Data<T> {
    data: T,
}

/// Error envelope of the engine API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
    code: String,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct StartProcessBody<'a> {
    definition_name: &'a str,
    variables: &'a VariableMap,
}

#[derive(Debug, Deserialize)]
struct StartedProcess {
    id: ProcessId,
}

impl RemoteEngine {
    /// * `base_url` - engine API root, e.g. `http://engine:8080/api/v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str, user: &User) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("x-user-id", user.id)
            .header("x-user-name", &user.name)
    }

    async fn send(request: reqwest::RequestBuilder) -> CoreResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| CoreError::Engine(e.to_string()))?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(error_from_response(response).await)
    }

    async fn json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> CoreResult<T> {
        let response = Self::send(request).await?;
        let envelope: Data<T> = response
            .json()
            .await
            .map_err(|e| CoreError::Engine(format!("malformed engine response: {e}")))?;
        Ok(envelope.data)
    }

    async fn bytes(request: reqwest::RequestBuilder) -> CoreResult<Vec<u8>> {
        let response = Self::send(request).await?;
        Ok(response
            .bytes()
            .await
            .map_err(|e| CoreError::Engine(e.to_string()))?
            .to_vec())
    }

    async fn unit(request: reqwest::RequestBuilder) -> CoreResult<()> {
        Self::send(request).await.map(|_| ())
    }
}

/// Read the error body of a failed engine response and map it back into
/// the typed domain error.
async fn error_from_response(response: reqwest::Response) -> CoreError {
    let status = response.status();
    let body: Option<ApiErrorBody> = response.json().await.ok();
    match body {
        Some(body) => error_from_envelope(status, body),
        None => CoreError::Engine(format!("engine answered {status} without an error body")),
    }
}

/// Translate an engine error envelope back into the typed domain error.
///
/// Codes with malformed or missing `details` fall back to
/// [`CoreError::Engine`] rather than inventing a partial typed error.
fn error_from_envelope(status: reqwest::StatusCode, body: ApiErrorBody) -> CoreError {
    let details = body.details.unwrap_or(serde_json::Value::Null);
    let detail_i64 = |key: &str| details.get(key).and_then(|v| v.as_i64());
    let detail_str =
        |key: &str| details.get(key).and_then(|v| v.as_str()).map(str::to_string);

    match body.code.as_str() {
        "PROCESS_NOT_FOUND" => match detail_i64("id") {
            Some(id) => CoreError::ProcessNotFound { id },
            None => CoreError::Engine(body.error),
        },
        "DEFINITION_NOT_FOUND" => match detail_str("name") {
            Some(name) => CoreError::DefinitionNotFound { name },
            None => CoreError::Engine(body.error),
        },
        "EXECUTOR_NOT_FOUND" => match detail_i64("id") {
            Some(id) => CoreError::ExecutorNotFound { id },
            None => CoreError::Engine(body.error),
        },
        "PARENT_PROCESS_EXISTS" => match (detail_i64("id"), detail_i64("parent_id")) {
            (Some(id), Some(parent_id)) => CoreError::ParentProcessExists { id, parent_id },
            _ => CoreError::Engine(body.error),
        },
        "VALIDATION_ERROR" => {
            let errors: ValidationErrors =
                serde_json::from_value(details).unwrap_or_else(|_| {
                    let mut errors = ValidationErrors::default();
                    errors.add_global(body.error.clone());
                    errors
                });
            CoreError::Validation(errors)
        }
        "UNAUTHORIZED" => CoreError::Unauthorized(body.error),
        "FORBIDDEN" => CoreError::Forbidden(body.error),
        _ => CoreError::Engine(format!("engine answered {status}: {}", body.error)),
    }
}

#[async_trait]
impl ExecutionService for RemoteEngine {
    async fn start_process(
        &self,
        user: &User,
        definition_name: &str,
        variables: VariableMap,
    ) -> CoreResult<ProcessId> {
        let body = StartProcessBody {
            definition_name,
            variables: &variables,
        };
        let started: StartedProcess = Self::json(
            self.request(reqwest::Method::POST, "/processes", user)
                .json(&body),
        )
        .await?;
        Ok(started.id)
    }

    async fn process_count(
        &self,
        user: &User,
        presentation: &BatchPresentation,
    ) -> CoreResult<u64> {
        Self::json(
            self.request(reqwest::Method::POST, "/processes/query/count", user)
                .json(presentation),
        )
        .await
    }

    async fn processes(
        &self,
        user: &User,
        presentation: &BatchPresentation,
    ) -> CoreResult<Vec<WfProcess>> {
        Self::json(
            self.request(reqwest::Method::POST, "/processes/query", user)
                .json(presentation),
        )
        .await
    }

    async fn processes_by_filter(
        &self,
        user: &User,
        filter: &ProcessFilter,
    ) -> CoreResult<Vec<WfProcess>> {
        Self::json(
            self.request(reqwest::Method::POST, "/processes/search", user)
                .json(filter),
        )
        .await
    }

    async fn process(&self, user: &User, id: ProcessId) -> CoreResult<WfProcess> {
        Self::json(self.request(reqwest::Method::GET, &format!("/processes/{id}"), user)).await
    }

    async fn parent_process(&self, user: &User, id: ProcessId) -> CoreResult<Option<WfProcess>> {
        Self::json(self.request(
            reqwest::Method::GET,
            &format!("/processes/{id}/parent"),
            user,
        ))
        .await
    }

    async fn subprocesses(
        &self,
        user: &User,
        id: ProcessId,
        recursive: bool,
    ) -> CoreResult<Vec<WfProcess>> {
        Self::json(self.request(
            reqwest::Method::GET,
            &format!("/processes/{id}/subprocesses?recursive={recursive}"),
            user,
        ))
        .await
    }

    async fn cancel_process(&self, user: &User, id: ProcessId) -> CoreResult<()> {
        Self::unit(self.request(
            reqwest::Method::POST,
            &format!("/processes/{id}/cancel"),
            user,
        ))
        .await
    }

    async fn swimlanes(&self, user: &User, id: ProcessId) -> CoreResult<Vec<WfSwimlane>> {
        Self::json(self.request(
            reqwest::Method::GET,
            &format!("/processes/{id}/swimlanes"),
            user,
        ))
        .await
    }

    async fn assign_swimlane(
        &self,
        user: &User,
        id: ProcessId,
        swimlane_name: &str,
        executor: Executor,
    ) -> CoreResult<()> {
        Self::unit(
            self.request(
                reqwest::Method::PUT,
                &format!("/processes/{id}/swimlanes/{swimlane_name}"),
                user,
            )
            .json(&executor),
        )
        .await
    }

    async fn variables(&self, user: &User, id: ProcessId) -> CoreResult<Vec<WfVariable>> {
        Self::json(self.request(
            reqwest::Method::GET,
            &format!("/processes/{id}/variables"),
            user,
        ))
        .await
    }

    async fn variable(
        &self,
        user: &User,
        id: ProcessId,
        name: &str,
    ) -> CoreResult<Option<WfVariable>> {
        Self::json(self.request(
            reqwest::Method::GET,
            &format!("/processes/{id}/variables/{name}"),
            user,
        ))
        .await
    }

    async fn task_variable(
        &self,
        user: &User,
        id: ProcessId,
        task_id: TaskId,
        name: &str,
    ) -> CoreResult<Option<WfVariable>> {
        Self::json(self.request(
            reqwest::Method::GET,
            &format!("/processes/{id}/tasks/{task_id}/variables/{name}"),
            user,
        ))
        .await
    }

    async fn file_variable_value(
        &self,
        user: &User,
        id: ProcessId,
        name: &str,
    ) -> CoreResult<Option<FileVariable>> {
        Self::json(self.request(
            reqwest::Method::GET,
            &format!("/processes/{id}/variables/{name}/file"),
            user,
        ))
        .await
    }

    async fn update_variables(
        &self,
        user: &User,
        id: ProcessId,
        variables: VariableMap,
    ) -> CoreResult<()> {
        Self::unit(
            self.request(
                reqwest::Method::PUT,
                &format!("/processes/{id}/variables"),
                user,
            )
            .json(&variables),
        )
        .await
    }

    async fn process_diagram(
        &self,
        user: &User,
        id: ProcessId,
        task_id: Option<TaskId>,
        child_process_id: Option<ProcessId>,
        subprocess_id: Option<&str>,
    ) -> CoreResult<Vec<u8>> {
        let mut query = Vec::new();
        if let Some(task_id) = task_id {
            query.push(format!("task_id={task_id}"));
        }
        if let Some(child) = child_process_id {
            query.push(format!("child_process_id={child}"));
        }
        if let Some(sub) = subprocess_id {
            query.push(format!("subprocess_id={sub}"));
        }
        let suffix = if query.is_empty() {
            String::new()
        } else {
            format!("?{}", query.join("&"))
        };
        Self::bytes(self.request(
            reqwest::Method::GET,
            &format!("/processes/{id}/diagram{suffix}"),
            user,
        ))
        .await
    }

    async fn process_diagram_elements(
        &self,
        user: &User,
        id: ProcessId,
        subprocess_id: Option<&str>,
    ) -> CoreResult<Vec<NodeGraphElement>> {
        let suffix = subprocess_id
            .map(|sub| format!("?subprocess_id={sub}"))
            .unwrap_or_default();
        Self::json(self.request(
            reqwest::Method::GET,
            &format!("/processes/{id}/diagram/elements{suffix}"),
            user,
        ))
        .await
    }

    async fn process_diagram_element(
        &self,
        user: &User,
        id: ProcessId,
        node_id: &str,
    ) -> CoreResult<Option<NodeGraphElement>> {
        Self::json(self.request(
            reqwest::Method::GET,
            &format!("/processes/{id}/diagram/elements/{node_id}"),
            user,
        ))
        .await
    }

    async fn remove_processes(&self, user: &User, filter: &ProcessFilter) -> CoreResult<()> {
        Self::unit(
            self.request(reqwest::Method::DELETE, "/processes", user)
                .json(filter),
        )
        .await
    }

    async fn process_errors(&self, user: &User, id: ProcessId) -> CoreResult<Vec<ProcessError>> {
        Self::json(self.request(
            reqwest::Method::GET,
            &format!("/processes/{id}/errors"),
            user,
        ))
        .await
    }

    async fn upgrade_process_to_definition_version(
        &self,
        user: &User,
        id: ProcessId,
        version: i64,
    ) -> CoreResult<bool> {
        Self::json(
            self.request(
                reqwest::Method::POST,
                &format!("/processes/{id}/upgrade"),
                user,
            )
            .json(&serde_json::json!({ "version": version })),
        )
        .await
    }

    async fn process_jobs(
        &self,
        user: &User,
        id: ProcessId,
        recursive: bool,
    ) -> CoreResult<Vec<WfJob>> {
        Self::json(self.request(
            reqwest::Method::GET,
            &format!("/processes/{id}/jobs?recursive={recursive}"),
            user,
        ))
        .await
    }
}

#[async_trait]
impl ExecutorService for RemoteEngine {
    async fn executor(&self, user: &User, id: ExecutorId) -> CoreResult<Executor> {
        Self::json(self.request(reqwest::Method::GET, &format!("/executors/{id}"), user)).await
    }

    async fn set_status(&self, user: &User, actor_id: ExecutorId, active: bool) -> CoreResult<()> {
        Self::unit(
            self.request(
                reqwest::Method::POST,
                &format!("/executors/{actor_id}/status"),
                user,
            )
            .json(&serde_json::json!({ "active": active })),
        )
        .await
    }

    async fn executors(
        &self,
        user: &User,
        presentation: &BatchPresentation,
    ) -> CoreResult<Vec<Executor>> {
        Self::json(
            self.request(reqwest::Method::POST, "/executors/query", user)
                .json(presentation),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn envelope(code: &str, error: &str, details: Option<serde_json::Value>) -> ApiErrorBody {
        ApiErrorBody {
            error: error.to_string(),
            code: code.to_string(),
            details,
        }
    }

    #[test]
    fn not_found_codes_rebuild_typed_errors() {
        let err = error_from_envelope(
            reqwest::StatusCode::NOT_FOUND,
            envelope("PROCESS_NOT_FOUND", "no such process", Some(json!({ "id": 42 }))),
        );
        assert_matches!(err, CoreError::ProcessNotFound { id: 42 });

        let err = error_from_envelope(
            reqwest::StatusCode::NOT_FOUND,
            envelope(
                "DEFINITION_NOT_FOUND",
                "no such definition",
                Some(json!({ "name": "payment" })),
            ),
        );
        assert_matches!(err, CoreError::DefinitionNotFound { name } if name == "payment");
    }

    #[test]
    fn parent_process_conflict_carries_both_ids() {
        let err = error_from_envelope(
            reqwest::StatusCode::CONFLICT,
            envelope(
                "PARENT_PROCESS_EXISTS",
                "cannot remove",
                Some(json!({ "id": 7, "parent_id": 3 })),
            ),
        );
        assert_matches!(err, CoreError::ParentProcessExists { id: 7, parent_id: 3 });
    }

    #[test]
    fn validation_details_deserialize_into_field_messages() {
        let err = error_from_envelope(
            reqwest::StatusCode::BAD_REQUEST,
            envelope(
                "VALIDATION_ERROR",
                "validation failed",
                Some(json!({ "global": [], "fields": { "amount": ["is required"] } })),
            ),
        );
        let errors = assert_matches!(err, CoreError::Validation(errors) => errors);
        assert_eq!(errors.fields["amount"], vec!["is required"]);
    }

    #[test]
    fn malformed_validation_details_fall_back_to_a_global_message() {
        let err = error_from_envelope(
            reqwest::StatusCode::BAD_REQUEST,
            envelope("VALIDATION_ERROR", "validation failed", Some(json!("garbage"))),
        );
        let errors = assert_matches!(err, CoreError::Validation(errors) => errors);
        assert_eq!(errors.global, vec!["validation failed"]);
        assert!(errors.fields.is_empty());
    }

    #[test]
    fn missing_details_degrade_to_an_engine_error() {
        let err = error_from_envelope(
            reqwest::StatusCode::NOT_FOUND,
            envelope("PROCESS_NOT_FOUND", "no such process", None),
        );
        assert_matches!(err, CoreError::Engine(message) if message == "no such process");
    }

    #[test]
    fn unknown_codes_keep_the_status_and_message() {
        let err = error_from_envelope(
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
            envelope("TEAPOT", "out of water", None),
        );
        let message = assert_matches!(err, CoreError::Engine(message) => message);
        assert!(message.contains("503"));
        assert!(message.contains("out of water"));
    }
}
