use std::sync::Arc;

use flowgate_service::{ExecutionService, ExecutorService};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Process execution boundary of the engine.
    pub execution: Arc<dyn ExecutionService>,
    /// Executor administration boundary of the engine.
    pub executors: Arc<dyn ExecutorService>,
    /// Server configuration (JWT secret, engine mode).
    pub config: Arc<ServerConfig>,
}
