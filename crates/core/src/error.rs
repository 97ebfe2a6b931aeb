//! Domain error type shared by the service boundary and the HTTP layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filter::FilterFormatError;
use crate::presentation::PresentationError;
use crate::types::{ExecutorId, ProcessId};

/// Failure conditions of the engine service boundary.
///
/// Every operation on the boundary reports failures through this enum; the
/// HTTP layer maps each variant to a status code and JSON error envelope.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No process with the given id exists.
    #[error("Process with id {id} does not exist")]
    ProcessNotFound { id: ProcessId },

    /// No deployed definition with the given name exists.
    #[error("Definition '{name}' does not exist")]
    DefinitionNotFound { name: String },

    /// No executor (user or group) with the given id exists.
    #[error("Executor with id {id} does not exist")]
    ExecutorNotFound { id: ExecutorId },

    /// A process cannot be removed while its parent process exists.
    #[error("Process {id} cannot be removed: parent process {parent_id} exists")]
    ParentProcessExists {
        id: ProcessId,
        parent_id: ProcessId,
    },

    /// Submitted variables failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A filter criteria was malformed.
    #[error(transparent)]
    Filter(#[from] FilterFormatError),

    /// A batch presentation was misconfigured.
    #[error(transparent)]
    Presentation(#[from] PresentationError),

    /// The caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The engine could not be reached or answered with garbage.
    #[error("Engine unavailable: {0}")]
    Engine(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias for boundary operation results.
pub type CoreResult<T> = Result<T, CoreError>;

/// Per-field and global validation messages, collected during variable
/// submission checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    /// Messages not tied to a particular variable.
    pub global: Vec<String>,
    /// Messages keyed by variable name.
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.fields.is_empty()
    }

    pub fn add_global(&mut self, message: impl Into<String>) {
        self.global.push(message.into());
    }

    pub fn add_field(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    /// Wrap into a [`CoreError::Validation`] if any message was recorded.
    pub fn into_result(self) -> CoreResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = self.global.clone();
        for (field, messages) in &self.fields {
            for message in messages {
                parts.push(format!("{field}: {message}"));
            }
        }
        write!(f, "{}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_validation_errors_convert_to_ok() {
        assert!(ValidationErrors::default().into_result().is_ok());
    }

    #[test]
    fn field_messages_render_with_field_name() {
        let mut errors = ValidationErrors::default();
        errors.add_global("request rejected");
        errors.add_field("amount", "is required");
        let text = errors.to_string();
        assert_eq!(text, "request rejected; amount: is required");
    }

    #[test]
    fn non_empty_validation_errors_convert_to_err() {
        let mut errors = ValidationErrors::default();
        errors.add_field("amount", "must be a number");
        match errors.into_result() {
            Err(CoreError::Validation(inner)) => {
                assert_eq!(inner.fields["amount"], vec!["must be a number"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
