// src/application/ports/authorization_state.rs
use crate::application::ApplicationResult;
use crate::domain::AuthorizationState;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait AuthorizationStateStore: Send + Sync {
    /// Store a pending authorization. An existing record under the same
    /// `state` is replaced.
    async fn put_state(&self, state: &str, record: AuthorizationState) -> ApplicationResult<()>;

    /// Atomically remove the record and return it if present.
    async fn take_state(&self, state: &str) -> ApplicationResult<Option<AuthorizationState>>;

    /// Physically evict records that expired before `now`. Returns the number removed.
    async fn purge_expired_states(&self, now: DateTime<Utc>) -> ApplicationResult<usize>;
}
