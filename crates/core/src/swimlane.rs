//! Swimlanes: named role slots within a process.

use serde::{Deserialize, Serialize};

use crate::executor::Executor;

/// A role slot of a process, optionally assigned to an executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WfSwimlane {
    pub name: String,
    pub executor: Option<Executor>,
}

impl WfSwimlane {
    pub fn unassigned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            executor: None,
        }
    }
}
