//! In-process stand-in for the workflow engine.
//!
//! Backs the dev server mode and the HTTP layer's integration tests. It
//! honors the boundary's error semantics (not-found, start validation,
//! parent-exists on removal, presentation filtering) over plain maps, and
//! deliberately implements none of the engine proper: no token
//! advancement, timers, or persistence.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use flowgate_core::error::{CoreError, CoreResult, ValidationErrors};
use flowgate_core::executor::{Executor, User};
use flowgate_core::graph::NodeGraphElement;
use flowgate_core::job::WfJob;
use flowgate_core::presentation::{
    executor_field_value, process_field_value, BatchPresentation,
};
use flowgate_core::process::{ExecutionStatus, ProcessError, ProcessFilter, WfProcess};
use flowgate_core::swimlane::WfSwimlane;
use flowgate_core::types::{ExecutorId, JobId, ProcessId, TaskId, Timestamp};
use flowgate_core::variable::{FileVariable, VariableMap, VariableValue, WfVariable};

use crate::definition::ProcessDefinition;
use crate::execution::ExecutionService;
use crate::executors::ExecutorService;

#[derive(Debug)]
struct ProcessEntry {
    process: WfProcess,
    variables: VariableMap,
    /// Task-scoped values layered over the process scope.
    task_variables: BTreeMap<(TaskId, String), VariableValue>,
    swimlanes: BTreeMap<String, Option<Executor>>,
    jobs: Vec<WfJob>,
    errors: Vec<ProcessError>,
}

#[derive(Default)]
struct EngineState {
    /// Definition versions keyed by name, then version.
    definitions: BTreeMap<String, BTreeMap<i64, ProcessDefinition>>,
    processes: BTreeMap<ProcessId, ProcessEntry>,
    executors: BTreeMap<ExecutorId, Executor>,
    next_process_id: ProcessId,
    next_job_id: JobId,
}

/// The in-memory engine. Cheap to construct per test; share behind an
/// `Arc` when used as application state.
pub struct InMemoryEngine {
    state: RwLock<EngineState>,
}

impl Default for InMemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(EngineState {
                next_process_id: 1,
                next_job_id: 1,
                ..Default::default()
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // -- seeding -----------------------------------------------------------

    /// Deploy a definition version.
    pub fn seed_definition(&self, definition: ProcessDefinition) {
        let mut state = self.write();
        state
            .definitions
            .entry(definition.name.clone())
            .or_default()
            .insert(definition.version, definition);
    }

    /// Register an executor.
    pub fn seed_executor(&self, executor: Executor) {
        self.write().executors.insert(executor.id(), executor);
    }

    /// Attach a job (timer) to a process.
    pub fn seed_job(
        &self,
        process_id: ProcessId,
        name: impl Into<String>,
        due_date: Option<Timestamp>,
    ) -> CoreResult<JobId> {
        let mut state = self.write();
        let id = state.next_job_id;
        state.next_job_id += 1;
        let entry = entry_mut(&mut state, process_id)?;
        entry.jobs.push(WfJob {
            id,
            name: name.into(),
            process_id,
            due_date,
        });
        Ok(id)
    }

    /// Record a node failure against a process.
    pub fn seed_process_error(
        &self,
        process_id: ProcessId,
        node_id: impl Into<String>,
        message: impl Into<String>,
    ) -> CoreResult<()> {
        let mut state = self.write();
        let entry = entry_mut(&mut state, process_id)?;
        entry.errors.push(ProcessError {
            process_id,
            node_id: node_id.into(),
            message: message.into(),
            occurred_at: Utc::now(),
        });
        if entry.process.status == ExecutionStatus::Active {
            entry.process.status = ExecutionStatus::Failed;
        }
        Ok(())
    }

    /// Set a task-scoped variable value.
    pub fn seed_task_variable(
        &self,
        process_id: ProcessId,
        task_id: TaskId,
        name: impl Into<String>,
        value: VariableValue,
    ) -> CoreResult<()> {
        let mut state = self.write();
        let entry = entry_mut(&mut state, process_id)?;
        entry.task_variables.insert((task_id, name.into()), value);
        Ok(())
    }

    /// Spawn a subprocess under an existing process, the way the engine
    /// would when reaching a subprocess node.
    pub fn spawn_subprocess(
        &self,
        parent_id: ProcessId,
        definition_name: &str,
    ) -> CoreResult<ProcessId> {
        let mut state = self.write();
        let definition = latest_definition(&state, definition_name)?.clone();
        let parent_hierarchy = state
            .processes
            .get(&parent_id)
            .ok_or(CoreError::ProcessNotFound { id: parent_id })?
            .process
            .hierarchy_ids
            .clone();
        let id = allocate_process(&mut state, definition, VariableMap::new());
        let entry = state.processes.get_mut(&id).expect("just inserted");
        entry.process.parent_id = Some(parent_id);
        entry.process.hierarchy_ids = parent_hierarchy;
        entry.process.hierarchy_ids.push(id);
        Ok(id)
    }

    fn descendants(state: &EngineState, id: ProcessId) -> Vec<ProcessId> {
        let mut found = Vec::new();
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            for (child_id, entry) in &state.processes {
                if entry.process.parent_id == Some(current) {
                    found.push(*child_id);
                    frontier.push(*child_id);
                }
            }
        }
        found
    }
}

fn entry<'a>(state: &'a EngineState, id: ProcessId) -> CoreResult<&'a ProcessEntry> {
    state
        .processes
        .get(&id)
        .ok_or(CoreError::ProcessNotFound { id })
}

fn entry_mut<'a>(state: &'a mut EngineState, id: ProcessId) -> CoreResult<&'a mut ProcessEntry> {
    state
        .processes
        .get_mut(&id)
        .ok_or(CoreError::ProcessNotFound { id })
}

fn latest_definition<'a>(
    state: &'a EngineState,
    name: &str,
) -> CoreResult<&'a ProcessDefinition> {
    state
        .definitions
        .get(name)
        .and_then(|versions| versions.values().next_back())
        .ok_or_else(|| CoreError::DefinitionNotFound {
            name: name.to_string(),
        })
}

/// Insert a new root process for the definition; returns its id.
fn allocate_process(
    state: &mut EngineState,
    definition: ProcessDefinition,
    variables: VariableMap,
) -> ProcessId {
    let id = state.next_process_id;
    state.next_process_id += 1;
    let process = WfProcess {
        id,
        definition_name: definition.name.clone(),
        definition_version: definition.version,
        status: ExecutionStatus::Active,
        start_date: Utc::now(),
        end_date: None,
        parent_id: None,
        hierarchy_ids: vec![id],
    };
    let swimlanes = definition
        .swimlanes
        .iter()
        .map(|name| (name.clone(), None))
        .collect();
    state.processes.insert(
        id,
        ProcessEntry {
            process,
            variables,
            task_variables: BTreeMap::new(),
            swimlanes,
            jobs: Vec::new(),
            errors: Vec::new(),
        },
    );
    id
}

/// Check submitted start variables against the definition's declarations.
fn validate_start_variables(
    definition: &ProcessDefinition,
    variables: &VariableMap,
) -> CoreResult<()> {
    let mut errors = ValidationErrors::default();
    for declaration in &definition.variables {
        match variables.get(&declaration.name) {
            None if declaration.required => {
                errors.add_field(&declaration.name, "is required");
            }
            Some(value) if !declaration.accepts(value) => {
                errors.add_field(
                    &declaration.name,
                    format!(
                        "expected {}, got {}",
                        declaration.expected_type.unwrap_or("any"),
                        value.type_name()
                    ),
                );
            }
            _ => {}
        }
    }
    errors.into_result()
}

#[async_trait]
impl ExecutionService for InMemoryEngine {
    async fn start_process(
        &self,
        user: &User,
        definition_name: &str,
        variables: VariableMap,
    ) -> CoreResult<ProcessId> {
        let mut state = self.write();
        let definition = latest_definition(&state, definition_name)?.clone();
        validate_start_variables(&definition, &variables)?;
        let id = allocate_process(&mut state, definition, variables);
        tracing::debug!(process_id = id, definition = definition_name, user = %user.name, "process started");
        Ok(id)
    }

    async fn process_count(
        &self,
        _user: &User,
        presentation: &BatchPresentation,
    ) -> CoreResult<u64> {
        let state = self.read();
        let count = state
            .processes
            .values()
            .filter(|e| presentation.accepts(|f| process_field_value(&e.process, f)))
            .count();
        Ok(count as u64)
    }

    async fn processes(
        &self,
        _user: &User,
        presentation: &BatchPresentation,
    ) -> CoreResult<Vec<WfProcess>> {
        let state = self.read();
        let mut matched: Vec<WfProcess> = state
            .processes
            .values()
            .filter(|e| presentation.accepts(|f| process_field_value(&e.process, f)))
            .map(|e| e.process.clone())
            .collect();
        presentation.sort(&mut matched, |p, f| process_field_value(p, f));
        Ok(presentation.paginate(matched))
    }

    async fn processes_by_filter(
        &self,
        _user: &User,
        filter: &ProcessFilter,
    ) -> CoreResult<Vec<WfProcess>> {
        let state = self.read();
        Ok(state
            .processes
            .values()
            .filter(|e| filter.accepts(&e.process))
            .map(|e| e.process.clone())
            .collect())
    }

    async fn process(&self, _user: &User, id: ProcessId) -> CoreResult<WfProcess> {
        Ok(entry(&self.read(), id)?.process.clone())
    }

    async fn parent_process(
        &self,
        _user: &User,
        id: ProcessId,
    ) -> CoreResult<Option<WfProcess>> {
        let state = self.read();
        let parent_id = entry(&state, id)?.process.parent_id;
        Ok(parent_id.and_then(|pid| state.processes.get(&pid).map(|e| e.process.clone())))
    }

    async fn subprocesses(
        &self,
        _user: &User,
        id: ProcessId,
        recursive: bool,
    ) -> CoreResult<Vec<WfProcess>> {
        let state = self.read();
        entry(&state, id)?;
        let ids = if recursive {
            Self::descendants(&state, id)
        } else {
            state
                .processes
                .iter()
                .filter(|(_, e)| e.process.parent_id == Some(id))
                .map(|(child_id, _)| *child_id)
                .collect()
        };
        Ok(ids
            .iter()
            .filter_map(|child_id| state.processes.get(child_id))
            .map(|e| e.process.clone())
            .collect())
    }

    async fn cancel_process(&self, user: &User, id: ProcessId) -> CoreResult<()> {
        let mut state = self.write();
        let entry = entry_mut(&mut state, id)?;
        if !entry.process.is_ended() {
            entry.process.status = ExecutionStatus::Ended;
            entry.process.end_date = Some(Utc::now());
            tracing::debug!(process_id = id, user = %user.name, "process cancelled");
        }
        Ok(())
    }

    async fn swimlanes(&self, _user: &User, id: ProcessId) -> CoreResult<Vec<WfSwimlane>> {
        let state = self.read();
        Ok(entry(&state, id)?
            .swimlanes
            .iter()
            .map(|(name, executor)| WfSwimlane {
                name: name.clone(),
                executor: executor.clone(),
            })
            .collect())
    }

    async fn assign_swimlane(
        &self,
        _user: &User,
        id: ProcessId,
        swimlane_name: &str,
        executor: Executor,
    ) -> CoreResult<()> {
        let mut state = self.write();
        let entry = entry_mut(&mut state, id)?;
        entry
            .swimlanes
            .insert(swimlane_name.to_string(), Some(executor));
        Ok(())
    }

    async fn variables(&self, _user: &User, id: ProcessId) -> CoreResult<Vec<WfVariable>> {
        let state = self.read();
        let entry = entry(&state, id)?;
        let declared = state
            .definitions
            .get(&entry.process.definition_name)
            .and_then(|versions| versions.get(&entry.process.definition_version));

        let mut variables = Vec::new();
        let mut seen = std::collections::BTreeSet::new();
        if let Some(definition) = declared {
            for declaration in &definition.variables {
                seen.insert(declaration.name.clone());
                variables.push(WfVariable {
                    name: declaration.name.clone(),
                    value: entry.variables.get(&declaration.name).cloned(),
                });
            }
        }
        for (name, value) in &entry.variables {
            if !seen.contains(name) {
                variables.push(WfVariable {
                    name: name.clone(),
                    value: Some(value.clone()),
                });
            }
        }
        Ok(variables)
    }

    async fn variable(
        &self,
        _user: &User,
        id: ProcessId,
        name: &str,
    ) -> CoreResult<Option<WfVariable>> {
        let state = self.read();
        let entry = entry(&state, id)?;
        if let Some(value) = entry.variables.get(name) {
            return Ok(Some(WfVariable {
                name: name.to_string(),
                value: Some(value.clone()),
            }));
        }
        let declared = state
            .definitions
            .get(&entry.process.definition_name)
            .and_then(|versions| versions.get(&entry.process.definition_version))
            .map(|d| d.variables.iter().any(|v| v.name == name))
            .unwrap_or(false);
        Ok(declared.then(|| WfVariable {
            name: name.to_string(),
            value: None,
        }))
    }

    async fn task_variable(
        &self,
        user: &User,
        id: ProcessId,
        task_id: TaskId,
        name: &str,
    ) -> CoreResult<Option<WfVariable>> {
        {
            let state = self.read();
            let entry = entry(&state, id)?;
            if let Some(value) = entry.task_variables.get(&(task_id, name.to_string())) {
                return Ok(Some(WfVariable {
                    name: name.to_string(),
                    value: Some(value.clone()),
                }));
            }
        }
        self.variable(user, id, name).await
    }

    async fn file_variable_value(
        &self,
        _user: &User,
        id: ProcessId,
        name: &str,
    ) -> CoreResult<Option<FileVariable>> {
        let state = self.read();
        let entry = entry(&state, id)?;
        Ok(match entry.variables.get(name) {
            Some(VariableValue::File(file)) => Some(file.clone()),
            _ => None,
        })
    }

    async fn update_variables(
        &self,
        _user: &User,
        id: ProcessId,
        variables: VariableMap,
    ) -> CoreResult<()> {
        let mut state = self.write();
        let entry = entry_mut(&mut state, id)?;
        entry.variables.extend(variables);
        Ok(())
    }

    async fn process_diagram(
        &self,
        _user: &User,
        id: ProcessId,
        _task_id: Option<TaskId>,
        _child_process_id: Option<ProcessId>,
        _subprocess_id: Option<&str>,
    ) -> CoreResult<Vec<u8>> {
        let state = self.read();
        let entry = entry(&state, id)?;
        let definition = state
            .definitions
            .get(&entry.process.definition_name)
            .and_then(|versions| versions.get(&entry.process.definition_version))
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "definition {} v{} missing for process {id}",
                    entry.process.definition_name, entry.process.definition_version
                ))
            })?;
        Ok(definition.diagram.clone())
    }

    async fn process_diagram_elements(
        &self,
        _user: &User,
        id: ProcessId,
        subprocess_id: Option<&str>,
    ) -> CoreResult<Vec<NodeGraphElement>> {
        let state = self.read();
        let entry = entry(&state, id)?;
        let nodes = state
            .definitions
            .get(&entry.process.definition_name)
            .and_then(|versions| versions.get(&entry.process.definition_version))
            .map(|d| d.nodes.clone())
            .unwrap_or_default();
        Ok(match subprocess_id {
            None => nodes,
            Some(sub) => nodes
                .into_iter()
                .filter(|n| n.subprocess_id.as_deref() == Some(sub))
                .collect(),
        })
    }

    async fn process_diagram_element(
        &self,
        user: &User,
        id: ProcessId,
        node_id: &str,
    ) -> CoreResult<Option<NodeGraphElement>> {
        let elements = self.process_diagram_elements(user, id, None).await?;
        Ok(elements.into_iter().find(|n| n.node_id == node_id))
    }

    async fn remove_processes(&self, user: &User, filter: &ProcessFilter) -> CoreResult<()> {
        let mut state = self.write();
        let mut removal: std::collections::BTreeSet<ProcessId> = state
            .processes
            .values()
            .filter(|e| filter.accepts(&e.process))
            .map(|e| e.process.id)
            .collect();

        // Removing a process takes its whole subtree with it.
        for id in removal.clone() {
            removal.extend(Self::descendants(&state, id));
        }

        for id in &removal {
            let parent_id = state.processes[id].process.parent_id;
            if let Some(parent_id) = parent_id {
                if state.processes.contains_key(&parent_id) && !removal.contains(&parent_id) {
                    return Err(CoreError::ParentProcessExists {
                        id: *id,
                        parent_id,
                    });
                }
            }
        }

        for id in &removal {
            state.processes.remove(id);
        }
        if !removal.is_empty() {
            tracing::debug!(count = removal.len(), user = %user.name, "processes removed");
        }
        Ok(())
    }

    async fn process_errors(
        &self,
        _user: &User,
        id: ProcessId,
    ) -> CoreResult<Vec<ProcessError>> {
        Ok(entry(&self.read(), id)?.errors.clone())
    }

    async fn upgrade_process_to_definition_version(
        &self,
        _user: &User,
        id: ProcessId,
        version: i64,
    ) -> CoreResult<bool> {
        let mut state = self.write();
        let name = entry(&state, id)?.process.definition_name.clone();
        if entry(&state, id)?.process.definition_version == version {
            return Ok(false);
        }
        let exists = state
            .definitions
            .get(&name)
            .is_some_and(|versions| versions.contains_key(&version));
        if !exists {
            return Err(CoreError::DefinitionNotFound {
                name: format!("{name} v{version}"),
            });
        }
        entry_mut(&mut state, id)?.process.definition_version = version;
        Ok(true)
    }

    async fn process_jobs(
        &self,
        _user: &User,
        id: ProcessId,
        recursive: bool,
    ) -> CoreResult<Vec<WfJob>> {
        let state = self.read();
        entry(&state, id)?;
        let mut ids = vec![id];
        if recursive {
            ids.extend(Self::descendants(&state, id));
        }
        Ok(ids
            .iter()
            .filter_map(|pid| state.processes.get(pid))
            .flat_map(|e| e.jobs.iter().cloned())
            .collect())
    }
}

#[async_trait]
impl ExecutorService for InMemoryEngine {
    async fn executor(&self, _user: &User, id: ExecutorId) -> CoreResult<Executor> {
        self.read()
            .executors
            .get(&id)
            .cloned()
            .ok_or(CoreError::ExecutorNotFound { id })
    }

    async fn set_status(
        &self,
        user: &User,
        actor_id: ExecutorId,
        active: bool,
    ) -> CoreResult<()> {
        let mut state = self.write();
        let executor = state
            .executors
            .get_mut(&actor_id)
            .ok_or(CoreError::ExecutorNotFound { id: actor_id })?;
        match executor {
            Executor::Actor(actor) => {
                actor.active = active;
                tracing::debug!(actor_id, active, user = %user.name, "actor status updated");
                Ok(())
            }
            Executor::Group(_) => {
                let mut errors = ValidationErrors::default();
                errors.add_global(format!("executor {actor_id} is a group, not an actor"));
                Err(CoreError::Validation(errors))
            }
        }
    }

    async fn executors(
        &self,
        _user: &User,
        presentation: &BatchPresentation,
    ) -> CoreResult<Vec<Executor>> {
        let state = self.read();
        let mut matched: Vec<Executor> = state
            .executors
            .values()
            .filter(|e| presentation.accepts(|f| executor_field_value(e, f)))
            .cloned()
            .collect();
        presentation.sort(&mut matched, |e, f| executor_field_value(e, f));
        Ok(presentation.paginate(matched))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use flowgate_core::executor::Actor;
    use flowgate_core::filter::{FieldFilter, StringFilterCriteria};
    use flowgate_core::presentation::process_fields;

    use crate::definition::VariableDefinition;

    use super::*;

    fn user() -> User {
        User::new(1, "tester")
    }

    fn engine_with(definition: ProcessDefinition) -> InMemoryEngine {
        let engine = InMemoryEngine::new();
        engine.seed_definition(definition);
        engine
    }

    fn payment_definition() -> ProcessDefinition {
        ProcessDefinition::new("payment", 1)
            .with_variable(VariableDefinition::required("amount", "long"))
            .with_variable(VariableDefinition::optional("comment"))
            .with_swimlane("requester")
            .with_swimlane("approver")
    }

    fn amount(value: i64) -> VariableMap {
        let mut variables = VariableMap::new();
        variables.insert("amount".into(), VariableValue::Long(value));
        variables
    }

    // -- start ---------------------------------------------------------------

    #[tokio::test]
    async fn start_unknown_definition_fails() {
        let engine = InMemoryEngine::new();
        let err = engine
            .start_process(&user(), "nope", VariableMap::new())
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::DefinitionNotFound { name } if name == "nope");
    }

    #[tokio::test]
    async fn start_without_required_variable_fails_validation() {
        let engine = engine_with(payment_definition());
        let err = engine
            .start_process(&user(), "payment", VariableMap::new())
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(errors) => {
            assert_eq!(errors.fields["amount"], vec!["is required"]);
        });
    }

    #[tokio::test]
    async fn start_with_wrong_type_fails_validation() {
        let engine = engine_with(payment_definition());
        let mut variables = VariableMap::new();
        variables.insert("amount".into(), VariableValue::Text("ten".into()));
        let err = engine
            .start_process(&user(), "payment", variables)
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[tokio::test]
    async fn start_uses_latest_definition_version() {
        let engine = engine_with(ProcessDefinition::new("payment", 1));
        engine.seed_definition(ProcessDefinition::new("payment", 3));
        let id = engine
            .start_process(&user(), "payment", VariableMap::new())
            .await
            .unwrap();
        let process = engine.process(&user(), id).await.unwrap();
        assert_eq!(process.definition_version, 3);
    }

    // -- reads ---------------------------------------------------------------

    #[tokio::test]
    async fn reads_of_absent_process_fail_not_found() {
        let engine = InMemoryEngine::new();
        assert_matches!(
            engine.process(&user(), 99).await.unwrap_err(),
            CoreError::ProcessNotFound { id: 99 }
        );
        assert_matches!(
            engine.swimlanes(&user(), 99).await.unwrap_err(),
            CoreError::ProcessNotFound { id: 99 }
        );
        assert_matches!(
            engine.variables(&user(), 99).await.unwrap_err(),
            CoreError::ProcessNotFound { id: 99 }
        );
        assert_matches!(
            engine.process_jobs(&user(), 99, false).await.unwrap_err(),
            CoreError::ProcessNotFound { id: 99 }
        );
    }

    #[tokio::test]
    async fn presentation_filters_and_pages_processes() {
        let engine = engine_with(payment_definition());
        engine.seed_definition(ProcessDefinition::new("vacation", 1));
        for _ in 0..3 {
            engine
                .start_process(&user(), "payment", amount(5))
                .await
                .unwrap();
        }
        engine
            .start_process(&user(), "vacation", VariableMap::new())
            .await
            .unwrap();

        let mut presentation = BatchPresentation::paged(1, 2);
        presentation.set_filter(
            process_fields::DEFINITION_NAME,
            FieldFilter::Text(StringFilterCriteria::new("payment")),
        );
        let page = engine.processes(&user(), &presentation).await.unwrap();
        assert_eq!(page.len(), 2);
        let count = engine.process_count(&user(), &presentation).await.unwrap();
        assert_eq!(count, 3);
    }

    // -- hierarchy -----------------------------------------------------------

    #[tokio::test]
    async fn subprocesses_recursive_walks_the_subtree() {
        let engine = engine_with(payment_definition());
        engine.seed_definition(ProcessDefinition::new("check", 1));
        let root = engine
            .start_process(&user(), "payment", amount(1))
            .await
            .unwrap();
        let child = engine.spawn_subprocess(root, "check").unwrap();
        let grandchild = engine.spawn_subprocess(child, "check").unwrap();

        let direct = engine.subprocesses(&user(), root, false).await.unwrap();
        assert_eq!(direct.len(), 1);
        assert_eq!(direct[0].id, child);

        let all = engine.subprocesses(&user(), root, true).await.unwrap();
        let mut ids: Vec<ProcessId> = all.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![child, grandchild]);

        let parent = engine.parent_process(&user(), child).await.unwrap();
        assert_eq!(parent.unwrap().id, root);
        let hierarchy = engine.process(&user(), grandchild).await.unwrap().hierarchy_ids;
        assert_eq!(hierarchy, vec![root, child, grandchild]);
    }

    // -- cancel / remove -----------------------------------------------------

    #[tokio::test]
    async fn cancel_marks_process_ended() {
        let engine = engine_with(payment_definition());
        let id = engine
            .start_process(&user(), "payment", amount(1))
            .await
            .unwrap();
        engine.cancel_process(&user(), id).await.unwrap();
        let process = engine.process(&user(), id).await.unwrap();
        assert_eq!(process.status, ExecutionStatus::Ended);
        assert!(process.end_date.is_some());
    }

    #[tokio::test]
    async fn removing_subprocess_with_live_parent_fails() {
        let engine = engine_with(payment_definition());
        engine.seed_definition(ProcessDefinition::new("check", 1));
        let root = engine
            .start_process(&user(), "payment", amount(1))
            .await
            .unwrap();
        let child = engine.spawn_subprocess(root, "check").unwrap();

        let filter = ProcessFilter {
            id: Some(child),
            ..Default::default()
        };
        let err = engine.remove_processes(&user(), &filter).await.unwrap_err();
        assert_matches!(err, CoreError::ParentProcessExists { id, parent_id }
            if id == child && parent_id == root);
    }

    #[tokio::test]
    async fn removing_root_takes_subtree_with_it() {
        let engine = engine_with(payment_definition());
        engine.seed_definition(ProcessDefinition::new("check", 1));
        let root = engine
            .start_process(&user(), "payment", amount(1))
            .await
            .unwrap();
        let child = engine.spawn_subprocess(root, "check").unwrap();

        let filter = ProcessFilter {
            id: Some(root),
            ..Default::default()
        };
        engine.remove_processes(&user(), &filter).await.unwrap();
        assert_matches!(
            engine.process(&user(), root).await.unwrap_err(),
            CoreError::ProcessNotFound { .. }
        );
        assert_matches!(
            engine.process(&user(), child).await.unwrap_err(),
            CoreError::ProcessNotFound { .. }
        );
    }

    // -- variables -----------------------------------------------------------

    #[tokio::test]
    async fn declared_but_unset_variable_reads_as_empty() {
        let engine = engine_with(payment_definition());
        let id = engine
            .start_process(&user(), "payment", amount(1))
            .await
            .unwrap();
        let variable = engine.variable(&user(), id, "comment").await.unwrap();
        assert_eq!(
            variable,
            Some(WfVariable {
                name: "comment".into(),
                value: None
            })
        );
        assert_eq!(engine.variable(&user(), id, "unknown").await.unwrap(), None);
    }

    #[tokio::test]
    async fn task_variable_overlays_process_scope() {
        let engine = engine_with(payment_definition());
        let id = engine
            .start_process(&user(), "payment", amount(1))
            .await
            .unwrap();
        engine
            .seed_task_variable(id, 7, "amount", VariableValue::Long(99))
            .unwrap();
        let task_scoped = engine.task_variable(&user(), id, 7, "amount").await.unwrap();
        assert_eq!(task_scoped.unwrap().value, Some(VariableValue::Long(99)));
        let other_task = engine.task_variable(&user(), id, 8, "amount").await.unwrap();
        assert_eq!(other_task.unwrap().value, Some(VariableValue::Long(1)));
    }

    #[tokio::test]
    async fn file_variable_round_trips_through_update() {
        let engine = engine_with(payment_definition());
        let id = engine
            .start_process(&user(), "payment", amount(1))
            .await
            .unwrap();
        let mut update = VariableMap::new();
        update.insert(
            "invoice".into(),
            VariableValue::File(FileVariable {
                name: "invoice.pdf".into(),
                content_type: "application/pdf".into(),
                data: vec![1, 2, 3],
            }),
        );
        engine.update_variables(&user(), id, update).await.unwrap();
        let file = engine
            .file_variable_value(&user(), id, "invoice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(
            engine.file_variable_value(&user(), id, "amount").await.unwrap(),
            None
        );
    }

    // -- upgrade / jobs / errors ---------------------------------------------

    #[tokio::test]
    async fn upgrade_to_same_version_returns_false() {
        let engine = engine_with(payment_definition());
        let id = engine
            .start_process(&user(), "payment", amount(1))
            .await
            .unwrap();
        assert!(!engine
            .upgrade_process_to_definition_version(&user(), id, 1)
            .await
            .unwrap());
        engine.seed_definition(ProcessDefinition::new("payment", 2));
        assert!(engine
            .upgrade_process_to_definition_version(&user(), id, 2)
            .await
            .unwrap());
        let process = engine.process(&user(), id).await.unwrap();
        assert_eq!(process.definition_version, 2);
    }

    #[tokio::test]
    async fn jobs_recursive_includes_subprocess_timers() {
        let engine = engine_with(payment_definition());
        engine.seed_definition(ProcessDefinition::new("check", 1));
        let root = engine
            .start_process(&user(), "payment", amount(1))
            .await
            .unwrap();
        let child = engine.spawn_subprocess(root, "check").unwrap();
        engine.seed_job(root, "escalation", None).unwrap();
        engine.seed_job(child, "reminder", None).unwrap();

        let own = engine.process_jobs(&user(), root, false).await.unwrap();
        assert_eq!(own.len(), 1);
        let all = engine.process_jobs(&user(), root, true).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn recorded_error_flips_status_to_failed() {
        let engine = engine_with(payment_definition());
        let id = engine
            .start_process(&user(), "payment", amount(1))
            .await
            .unwrap();
        engine
            .seed_process_error(id, "node-3", "handler blew up")
            .unwrap();
        let errors = engine.process_errors(&user(), id).await.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].node_id, "node-3");
        let process = engine.process(&user(), id).await.unwrap();
        assert_eq!(process.status, ExecutionStatus::Failed);
    }

    // -- executors -----------------------------------------------------------

    #[tokio::test]
    async fn set_status_toggles_actor_and_rejects_groups() {
        let engine = InMemoryEngine::new();
        engine.seed_executor(Executor::Actor(Actor {
            id: 10,
            name: "jdoe".into(),
            full_name: "John Doe".into(),
            active: true,
        }));
        engine.seed_executor(Executor::Group(flowgate_core::executor::Group {
            id: 11,
            name: "managers".into(),
            description: String::new(),
        }));

        engine.set_status(&user(), 10, false).await.unwrap();
        let executor = engine.executor(&user(), 10).await.unwrap();
        assert_matches!(executor, Executor::Actor(actor) => assert!(!actor.active));

        assert_matches!(
            engine.set_status(&user(), 11, true).await.unwrap_err(),
            CoreError::Validation(_)
        );
        assert_matches!(
            engine.set_status(&user(), 404, true).await.unwrap_err(),
            CoreError::ExecutorNotFound { id: 404 }
        );
    }
}
