//! Diagram graph elements for process views.

use serde::{Deserialize, Serialize};

/// Clickable rectangle of a node on the rendered diagram, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A node of the process graph as drawn on the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGraphElement {
    pub node_id: String,
    /// Label shown in tooltips/overlays; may be empty.
    #[serde(default)]
    pub label: String,
    pub bounds: GraphBounds,
    /// Id of the subprocess behind this node, for subprocess nodes.
    pub subprocess_id: Option<String>,
}
