//! Service boundary between the web layer and the workflow engine.
//!
//! [`ExecutionService`] and [`ExecutorService`] are the only way the web
//! layer reaches the engine. Two implementations ship here: a reqwest
//! client for a remote engine ([`remote::RemoteEngine`]) and an in-process
//! stand-in ([`memory::InMemoryEngine`]) for development and tests.

pub mod definition;
pub mod execution;
pub mod executors;
pub mod memory;
pub mod remote;

pub use execution::ExecutionService;
pub use executors::ExecutorService;
