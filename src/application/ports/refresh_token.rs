// src/application/ports/refresh_token.rs
use crate::application::ApplicationResult;
use crate::domain::RefreshTokenRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Refresh tokens are addressed by a one-way hash of the raw token.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn store_refresh_token(
        &self,
        token_hash: &str,
        record: RefreshTokenRecord,
    ) -> ApplicationResult<()>;

    /// Atomically remove the record and return it if present.
    async fn consume_refresh_token(
        &self,
        token_hash: &str,
    ) -> ApplicationResult<Option<RefreshTokenRecord>>;

    async fn purge_expired_refresh_tokens(&self, now: DateTime<Utc>) -> ApplicationResult<usize>;
}
