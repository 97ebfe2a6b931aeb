//! Process variables as exposed across the service boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Map of variable names to submitted values, as sent on process start and
/// bulk variable updates.
pub type VariableMap = BTreeMap<String, VariableValue>;

/// Typed variable value. The wire form is a tagged JSON object so clients
/// never have to guess between e.g. a date string and a plain string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum VariableValue {
    Text(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Date(Timestamp),
    File(FileVariable),
}

impl VariableValue {
    /// Name of the value's type, used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            VariableValue::Text(_) => "text",
            VariableValue::Long(_) => "long",
            VariableValue::Double(_) => "double",
            VariableValue::Boolean(_) => "boolean",
            VariableValue::Date(_) => "date",
            VariableValue::File(_) => "file",
        }
    }
}

/// A named variable with its current value, `None` when the variable is
/// declared but not yet set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WfVariable {
    pub name: String,
    pub value: Option<VariableValue>,
}

/// File-typed variable payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileVariable {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}
