//! Executors: the users and groups swimlanes are assigned to.

use serde::{Deserialize, Serialize};

use crate::types::ExecutorId;

/// Authenticated caller identity, passed to every service operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: ExecutorId,
    pub name: String,
}

impl User {
    pub fn new(id: ExecutorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A human user that can own tasks and hold swimlanes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ExecutorId,
    pub name: String,
    /// Display name; falls back to `name` in views when empty.
    #[serde(default)]
    pub full_name: String,
    /// Inactive actors are excluded from assignment pickers.
    pub active: bool,
}

/// A named set of executors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: ExecutorId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Either a single actor or a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Executor {
    Actor(Actor),
    Group(Group),
}

impl Executor {
    pub fn id(&self) -> ExecutorId {
        match self {
            Executor::Actor(actor) => actor.id,
            Executor::Group(group) => group.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Executor::Actor(actor) => &actor.name,
            Executor::Group(group) => &group.name,
        }
    }

    /// Name shown in views: an actor's full name when present, otherwise
    /// the plain name.
    pub fn display_name(&self) -> &str {
        match self {
            Executor::Actor(actor) if !actor.full_name.is_empty() => &actor.full_name,
            other => other.name(),
        }
    }
}
