//! Job (timer) DTO.

use serde::{Deserialize, Serialize};

use crate::types::{JobId, ProcessId, Timestamp};

/// A scheduled timer attached to a process node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WfJob {
    pub id: JobId,
    pub name: String,
    pub process_id: ProcessId,
    pub due_date: Option<Timestamp>,
}
