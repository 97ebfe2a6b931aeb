//! Process instance DTOs and the bulk-operation filter.

use serde::{Deserialize, Serialize};

use crate::types::{ProcessId, Timestamp};

/// Execution state of a process instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Active,
    Suspended,
    Ended,
    Failed,
}

impl ExecutionStatus {
    /// Ended processes never change state again.
    pub fn is_terminal(self) -> bool {
        matches!(self, ExecutionStatus::Ended)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionStatus::Active => "active",
            ExecutionStatus::Suspended => "suspended",
            ExecutionStatus::Ended => "ended",
            ExecutionStatus::Failed => "failed",
        }
    }
}

/// A running (or completed) instance of a workflow definition, as exposed
/// to the web layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WfProcess {
    pub id: ProcessId,
    pub definition_name: String,
    pub definition_version: i64,
    pub status: ExecutionStatus,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    /// Direct parent when this instance was spawned as a subprocess.
    pub parent_id: Option<ProcessId>,
    /// Ancestor chain from the root process down to this one, inclusive.
    pub hierarchy_ids: Vec<ProcessId>,
}

impl WfProcess {
    pub fn is_ended(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Search criteria for filtered listing and bulk removal of processes.
///
/// All fields are conjunctive; `None`/empty means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessFilter {
    pub id: Option<ProcessId>,
    pub definition_name: Option<String>,
    pub definition_version: Option<i64>,
    pub start_date_from: Option<Timestamp>,
    pub start_date_to: Option<Timestamp>,
    pub end_date_from: Option<Timestamp>,
    pub end_date_to: Option<Timestamp>,
    /// Only processes in [`ExecutionStatus::Failed`].
    #[serde(default)]
    pub failed_only: bool,
}

impl ProcessFilter {
    /// Test a process against every configured constraint.
    pub fn accepts(&self, process: &WfProcess) -> bool {
        if let Some(id) = self.id {
            if process.id != id {
                return false;
            }
        }
        if let Some(name) = &self.definition_name {
            if &process.definition_name != name {
                return false;
            }
        }
        if let Some(version) = self.definition_version {
            if process.definition_version != version {
                return false;
            }
        }
        if let Some(from) = self.start_date_from {
            if process.start_date < from {
                return false;
            }
        }
        if let Some(to) = self.start_date_to {
            if process.start_date > to {
                return false;
            }
        }
        if self.end_date_from.is_some() || self.end_date_to.is_some() {
            let Some(end_date) = process.end_date else {
                return false;
            };
            if self.end_date_from.is_some_and(|from| end_date < from) {
                return false;
            }
            if self.end_date_to.is_some_and(|to| end_date > to) {
                return false;
            }
        }
        if self.failed_only && process.status != ExecutionStatus::Failed {
            return false;
        }
        true
    }
}

/// A failure recorded against a node of a running process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessError {
    pub process_id: ProcessId,
    pub node_id: String,
    pub message: String,
    pub occurred_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    fn process(id: ProcessId, definition: &str, status: ExecutionStatus) -> WfProcess {
        WfProcess {
            id,
            definition_name: definition.into(),
            definition_version: 1,
            status,
            start_date: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            end_date: None,
            parent_id: None,
            hierarchy_ids: vec![id],
        }
    }

    #[test]
    fn default_filter_accepts_everything() {
        let filter = ProcessFilter::default();
        assert!(filter.accepts(&process(1, "payment", ExecutionStatus::Active)));
    }

    #[test]
    fn definition_name_must_match_exactly() {
        let filter = ProcessFilter {
            definition_name: Some("payment".into()),
            ..Default::default()
        };
        assert!(filter.accepts(&process(1, "payment", ExecutionStatus::Active)));
        assert!(!filter.accepts(&process(2, "payments", ExecutionStatus::Active)));
    }

    #[test]
    fn end_date_constraint_rejects_running_processes() {
        let filter = ProcessFilter {
            end_date_from: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(!filter.accepts(&process(1, "payment", ExecutionStatus::Active)));
    }

    #[test]
    fn failed_only_excludes_other_statuses() {
        let filter = ProcessFilter {
            failed_only: true,
            ..Default::default()
        };
        assert!(filter.accepts(&process(1, "payment", ExecutionStatus::Failed)));
        assert!(!filter.accepts(&process(2, "payment", ExecutionStatus::Ended)));
    }
}
