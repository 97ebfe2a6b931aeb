/// Engine-assigned identifiers are 64-bit integers.
pub type ProcessId = i64;

/// Executor (user or group) identifier.
pub type ExecutorId = i64;

/// Task identifier.
pub type TaskId = i64;

/// Job (timer) identifier.
pub type JobId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
