//! Deployed-definition seed model for the in-memory engine.
//!
//! The real engine owns definition deployment; the in-memory stand-in only
//! needs enough of a definition to validate start variables, enumerate
//! swimlanes, and answer diagram requests.

use flowgate_core::graph::NodeGraphElement;
use flowgate_core::variable::VariableValue;

/// Declaration of a single process variable.
#[derive(Debug, Clone)]
pub struct VariableDefinition {
    pub name: String,
    /// Required variables must be submitted on process start.
    pub required: bool,
    /// Expected value type (see [`VariableValue::type_name`]); `None`
    /// accepts any type.
    pub expected_type: Option<&'static str>,
}

impl VariableDefinition {
    pub fn required(name: impl Into<String>, expected_type: &'static str) -> Self {
        Self {
            name: name.into(),
            required: true,
            expected_type: Some(expected_type),
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            expected_type: None,
        }
    }

    /// Check a submitted value against the declaration.
    pub fn accepts(&self, value: &VariableValue) -> bool {
        self.expected_type
            .map(|expected| expected == value.type_name())
            .unwrap_or(true)
    }
}

/// A deployed process definition version.
#[derive(Debug, Clone)]
pub struct ProcessDefinition {
    pub name: String,
    pub version: i64,
    pub variables: Vec<VariableDefinition>,
    /// Swimlane names initialized on every started instance.
    pub swimlanes: Vec<String>,
    /// Diagram graph elements.
    pub nodes: Vec<NodeGraphElement>,
    /// Rendered diagram (PNG bytes).
    pub diagram: Vec<u8>,
}

impl ProcessDefinition {
    pub fn new(name: impl Into<String>, version: i64) -> Self {
        Self {
            name: name.into(),
            version,
            variables: Vec::new(),
            swimlanes: Vec::new(),
            nodes: Vec::new(),
            diagram: Vec::new(),
        }
    }

    pub fn with_variable(mut self, variable: VariableDefinition) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn with_swimlane(mut self, name: impl Into<String>) -> Self {
        self.swimlanes.push(name.into());
        self
    }

    pub fn with_node(mut self, node: NodeGraphElement) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_diagram(mut self, png: Vec<u8>) -> Self {
        self.diagram = png;
        self
    }
}
