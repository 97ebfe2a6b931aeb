//! Task DTO, as needed by the list-view renderers and task-scoped
//! variable reads.

use serde::{Deserialize, Serialize};

use crate::executor::{Actor, Executor};
use crate::types::{ProcessId, TaskId};

/// A work item of a running process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WfTask {
    pub id: TaskId,
    pub name: String,
    pub process_id: ProcessId,
    /// Executor the task is currently assigned to.
    pub owner: Executor,
    /// The actor the task was originally meant for, when it was acquired
    /// through a substitution rule.
    pub target_actor: Option<Actor>,
    #[serde(default)]
    pub acquired_by_substitution: bool,
}

impl WfTask {
    /// The executor to show as the task's owner: the substitution target
    /// when the task was acquired by substitution, otherwise the owner.
    pub fn effective_owner(&self) -> Executor {
        if self.acquired_by_substitution {
            if let Some(actor) = &self.target_actor {
                return Executor::Actor(actor.clone());
            }
        }
        self.owner.clone()
    }
}
