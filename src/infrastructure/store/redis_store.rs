// src/infrastructure/store/redis_store.rs
use super::{AUTHORIZATION_CODES, AUTHORIZATION_STATES, REFRESH_TOKENS};
use crate::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::{
        authorization_code::AuthorizationCodeStore, authorization_state::AuthorizationStateStore,
        refresh_token::RefreshTokenStore, time::Clock,
    },
};
use crate::domain::{AuthorizationCode, AuthorizationState, RefreshTokenRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

// GET and DEL in one round trip so two readers can never both see the record.
const TAKE_SCRIPT: &str = r#"
    local value = redis.call('GET', KEYS[1])
    if value then
        redis.call('DEL', KEYS[1])
    end
    return value
"#;

/// Redis-backed store. Records are JSON values with a native TTL derived from
/// `expires_at`; reads still re-check expiry.
#[derive(Clone)]
pub struct RedisLinkStore {
    pool: Pool,
    clock: Arc<dyn Clock>,
    prefix: String,
}

fn infra(err: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::infrastructure(err.to_string())
}

impl RedisLinkStore {
    /// Create a store from a redis URL (e.g. redis://:password@host:6379/0).
    pub fn from_url(url: &str, clock: Arc<dyn Clock>) -> Result<Self, ApplicationError> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg.create_pool(Some(Runtime::Tokio1)).map_err(infra)?;

        Ok(Self {
            pool,
            clock,
            prefix: "link".into(),
        })
    }

    /// Prefix every key, e.g. to isolate test runs sharing one server.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn key(&self, namespace: &str, id: &str) -> String {
        format!("{}:{namespace}:{id}", self.prefix)
    }

    async fn connection(&self) -> ApplicationResult<Connection> {
        self.pool.get().await.map_err(infra)
    }

    async fn put_json<T: Serialize + Sync>(
        &self,
        namespace: &str,
        id: &str,
        record: &T,
        expires_at: DateTime<Utc>,
    ) -> ApplicationResult<()> {
        let payload = serde_json::to_string(record).map_err(infra)?;
        let ttl_secs = (expires_at - self.clock.now()).num_seconds().max(1);
        let mut conn = self.connection().await?;

        let _: () = redis::cmd("SET")
            .arg(self.key(namespace, id))
            .arg(payload)
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(infra)?;
        Ok(())
    }

    async fn take_json<T: DeserializeOwned>(
        &self,
        namespace: &str,
        id: &str,
    ) -> ApplicationResult<Option<T>> {
        let mut conn = self.connection().await?;

        let raw: Option<String> = redis::cmd("EVAL")
            .arg(TAKE_SCRIPT)
            .arg(1)
            .arg(self.key(namespace, id))
            .query_async(&mut conn)
            .await
            .map_err(infra)?;

        raw.map(|value| serde_json::from_str(&value))
            .transpose()
            .map_err(infra)
    }
}

#[async_trait]
impl AuthorizationStateStore for RedisLinkStore {
    async fn put_state(&self, state: &str, record: AuthorizationState) -> ApplicationResult<()> {
        self.put_json(AUTHORIZATION_STATES, state, &record, record.expires_at)
            .await
    }

    async fn take_state(&self, state: &str) -> ApplicationResult<Option<AuthorizationState>> {
        self.take_json(AUTHORIZATION_STATES, state).await
    }

    // Redis evicts on TTL.
    async fn purge_expired_states(&self, _now: DateTime<Utc>) -> ApplicationResult<usize> {
        Ok(0)
    }
}

#[async_trait]
impl AuthorizationCodeStore for RedisLinkStore {
    async fn create_code(&self, code: &str, record: AuthorizationCode) -> ApplicationResult<()> {
        self.put_json(AUTHORIZATION_CODES, code, &record, record.expires_at)
            .await
    }

    async fn consume_code(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>> {
        self.take_json(AUTHORIZATION_CODES, code).await
    }

    async fn purge_expired_codes(&self, _now: DateTime<Utc>) -> ApplicationResult<usize> {
        Ok(0)
    }
}

#[async_trait]
impl RefreshTokenStore for RedisLinkStore {
    async fn store_refresh_token(
        &self,
        token_hash: &str,
        record: RefreshTokenRecord,
    ) -> ApplicationResult<()> {
        self.put_json(REFRESH_TOKENS, token_hash, &record, record.expires_at)
            .await
    }

    async fn consume_refresh_token(
        &self,
        token_hash: &str,
    ) -> ApplicationResult<Option<RefreshTokenRecord>> {
        self.take_json(REFRESH_TOKENS, token_hash).await
    }

    async fn purge_expired_refresh_tokens(&self, _now: DateTime<Utc>) -> ApplicationResult<usize> {
        Ok(0)
    }
}
