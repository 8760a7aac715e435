// src/application/ports/authorization_code.rs
use crate::application::ApplicationResult;
use crate::domain::AuthorizationCode;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait AuthorizationCodeStore: Send + Sync {
    async fn create_code(&self, code: &str, record: AuthorizationCode) -> ApplicationResult<()>;
    /// Consume (atomically remove) the code and return the stored value if present.
    async fn consume_code(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>>;
    async fn purge_expired_codes(&self, now: DateTime<Utc>) -> ApplicationResult<usize>;
}
