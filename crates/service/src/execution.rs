//! Process execution service boundary.

use async_trait::async_trait;
use flowgate_core::error::CoreResult;
use flowgate_core::executor::{Executor, User};
use flowgate_core::graph::NodeGraphElement;
use flowgate_core::job::WfJob;
use flowgate_core::presentation::BatchPresentation;
use flowgate_core::process::{ProcessError, ProcessFilter, WfProcess};
use flowgate_core::swimlane::WfSwimlane;
use flowgate_core::types::{ProcessId, TaskId};
use flowgate_core::variable::{FileVariable, VariableMap, WfVariable};

/// Contract the workflow engine exposes to the web layer.
///
/// Every operation takes the authenticated caller. Operations addressing a
/// specific process id fail with `CoreError::ProcessNotFound` when the
/// process is absent.
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// Start a new process by definition name.
    ///
    /// Fails with `DefinitionNotFound` when no definition carries the name
    /// and with `Validation` when the submitted variables are rejected.
    async fn start_process(
        &self,
        user: &User,
        definition_name: &str,
        variables: VariableMap,
    ) -> CoreResult<ProcessId>;

    /// Number of processes matching the presentation's filters, ignoring
    /// its paging.
    async fn process_count(
        &self,
        user: &User,
        presentation: &BatchPresentation,
    ) -> CoreResult<u64>;

    /// Processes for a batch presentation (filtered, sorted, paged).
    async fn processes(
        &self,
        user: &User,
        presentation: &BatchPresentation,
    ) -> CoreResult<Vec<WfProcess>>;

    /// Processes matching a [`ProcessFilter`].
    async fn processes_by_filter(
        &self,
        user: &User,
        filter: &ProcessFilter,
    ) -> CoreResult<Vec<WfProcess>>;

    /// A single process by id.
    async fn process(&self, user: &User, id: ProcessId) -> CoreResult<WfProcess>;

    /// The direct parent, when the process was started as a subprocess.
    async fn parent_process(&self, user: &User, id: ProcessId) -> CoreResult<Option<WfProcess>>;

    /// Direct subprocesses, or the whole subtree when `recursive`.
    async fn subprocesses(
        &self,
        user: &User,
        id: ProcessId,
        recursive: bool,
    ) -> CoreResult<Vec<WfProcess>>;

    /// Cancel a running process.
    async fn cancel_process(&self, user: &User, id: ProcessId) -> CoreResult<()>;

    /// All initialized roles of the process.
    async fn swimlanes(&self, user: &User, id: ProcessId) -> CoreResult<Vec<WfSwimlane>>;

    /// Assign a role to an executor by swimlane name.
    async fn assign_swimlane(
        &self,
        user: &User,
        id: ProcessId,
        swimlane_name: &str,
        executor: Executor,
    ) -> CoreResult<()>;

    /// All process variables, including declared-but-unset ones.
    async fn variables(&self, user: &User, id: ProcessId) -> CoreResult<Vec<WfVariable>>;

    /// A variable by name, `None` when the name is unknown.
    async fn variable(
        &self,
        user: &User,
        id: ProcessId,
        name: &str,
    ) -> CoreResult<Option<WfVariable>>;

    /// A variable by name in the scope of a task; tasks may carry extra
    /// values on top of the process scope.
    async fn task_variable(
        &self,
        user: &User,
        id: ProcessId,
        task_id: TaskId,
        name: &str,
    ) -> CoreResult<Option<WfVariable>>;

    /// The payload of a file-typed variable, `None` when unset or not a
    /// file.
    async fn file_variable_value(
        &self,
        user: &User,
        id: ProcessId,
        name: &str,
    ) -> CoreResult<Option<FileVariable>>;

    /// Update process variables without any signalling.
    async fn update_variables(
        &self,
        user: &User,
        id: ProcessId,
        variables: VariableMap,
    ) -> CoreResult<()>;

    /// The process diagram rendered as PNG. The optional ids select the
    /// active task, active subprocess state, and embedded subprocess to
    /// highlight.
    async fn process_diagram(
        &self,
        user: &User,
        id: ProcessId,
        task_id: Option<TaskId>,
        child_process_id: Option<ProcessId>,
        subprocess_id: Option<&str>,
    ) -> CoreResult<Vec<u8>>;

    /// Graph elements of the diagram, scoped to an embedded subprocess
    /// when `subprocess_id` is given.
    async fn process_diagram_elements(
        &self,
        user: &User,
        id: ProcessId,
        subprocess_id: Option<&str>,
    ) -> CoreResult<Vec<NodeGraphElement>>;

    /// A single graph element by node id.
    async fn process_diagram_element(
        &self,
        user: &User,
        id: ProcessId,
        node_id: &str,
    ) -> CoreResult<Option<NodeGraphElement>>;

    /// Remove every process matching the filter, including subprocesses.
    ///
    /// Fails with `ParentProcessExists` when a matched subprocess's parent
    /// survives the removal.
    async fn remove_processes(&self, user: &User, filter: &ProcessFilter) -> CoreResult<()>;

    /// Failures recorded against the process's nodes.
    async fn process_errors(&self, user: &User, id: ProcessId) -> CoreResult<Vec<ProcessError>>;

    /// Switch a running process to another deployed definition version.
    /// Returns `false` when the version equals the current one.
    async fn upgrade_process_to_definition_version(
        &self,
        user: &User,
        id: ProcessId,
        version: i64,
    ) -> CoreResult<bool>;

    /// Active jobs of the process, or of the whole subtree when
    /// `recursive`.
    async fn process_jobs(
        &self,
        user: &User,
        id: ProcessId,
        recursive: bool,
    ) -> CoreResult<Vec<WfJob>>;
}
