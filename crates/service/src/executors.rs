//! Executor administration boundary, as needed by the web layer's status
//! toggle and assignment pickers.

use async_trait::async_trait;
use flowgate_core::error::CoreResult;
use flowgate_core::executor::{Executor, User};
use flowgate_core::presentation::BatchPresentation;
use flowgate_core::types::ExecutorId;

#[async_trait]
pub trait ExecutorService: Send + Sync {
    /// An executor by id; fails with `ExecutorNotFound` when absent.
    async fn executor(&self, user: &User, id: ExecutorId) -> CoreResult<Executor>;

    /// Activate or deactivate an actor. Fails with `ExecutorNotFound` when
    /// the id is unknown and with `Validation` when it names a group.
    async fn set_status(&self, user: &User, actor_id: ExecutorId, active: bool) -> CoreResult<()>;

    /// Executors for a batch presentation (filtered, sorted, paged).
    async fn executors(
        &self,
        user: &User,
        presentation: &BatchPresentation,
    ) -> CoreResult<Vec<Executor>>;
}
