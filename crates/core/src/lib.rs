//! Flowgate domain model.
//!
//! DTOs, filter criteria, and batch-presentation objects shared by the
//! service boundary and the HTTP layer. This crate has no internal deps so
//! it can be used by both the gateway and any future CLI tooling.

pub mod error;
pub mod executor;
pub mod filter;
pub mod graph;
pub mod job;
pub mod presentation;
pub mod process;
pub mod swimlane;
pub mod task;
pub mod types;
pub mod variable;
