// src/infrastructure/store/memory.rs
use crate::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::{
        authorization_code::AuthorizationCodeStore, authorization_state::AuthorizationStateStore,
        refresh_token::RefreshTokenStore,
    },
};
use crate::domain::{AuthorizationCode, AuthorizationState, RefreshTokenRecord, link::Expiring};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Process-local store for all three namespaces. Each map sits behind its own
/// mutex, so remove-and-return is atomic per key.
#[derive(Default)]
pub struct InMemoryLinkStore {
    states: Mutex<HashMap<String, AuthorizationState>>,
    codes: Mutex<HashMap<String, AuthorizationCode>>,
    refresh_tokens: Mutex<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.states).map_or(0, |m| m.len())
            + lock(&self.codes).map_or(0, |m| m.len())
            + lock(&self.refresh_tokens).map_or(0, |m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock<T>(mutex: &Mutex<T>) -> ApplicationResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| ApplicationError::infrastructure("link store lock poisoned"))
}

fn purge<T: Expiring>(map: &mut HashMap<String, T>, now: DateTime<Utc>) -> usize {
    let before = map.len();
    map.retain(|_, record| !record.is_expired(now));
    before - map.len()
}

#[async_trait]
impl AuthorizationStateStore for InMemoryLinkStore {
    async fn put_state(&self, state: &str, record: AuthorizationState) -> ApplicationResult<()> {
        lock(&self.states)?.insert(state.to_owned(), record);
        Ok(())
    }

    async fn take_state(&self, state: &str) -> ApplicationResult<Option<AuthorizationState>> {
        Ok(lock(&self.states)?.remove(state))
    }

    async fn purge_expired_states(&self, now: DateTime<Utc>) -> ApplicationResult<usize> {
        let mut states = lock(&self.states)?;
        Ok(purge(&mut states, now))
    }
}

#[async_trait]
impl AuthorizationCodeStore for InMemoryLinkStore {
    async fn create_code(&self, code: &str, record: AuthorizationCode) -> ApplicationResult<()> {
        lock(&self.codes)?.insert(code.to_owned(), record);
        Ok(())
    }

    async fn consume_code(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>> {
        Ok(lock(&self.codes)?.remove(code))
    }

    async fn purge_expired_codes(&self, now: DateTime<Utc>) -> ApplicationResult<usize> {
        let mut codes = lock(&self.codes)?;
        Ok(purge(&mut codes, now))
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryLinkStore {
    async fn store_refresh_token(
        &self,
        token_hash: &str,
        record: RefreshTokenRecord,
    ) -> ApplicationResult<()> {
        lock(&self.refresh_tokens)?.insert(token_hash.to_owned(), record);
        Ok(())
    }

    async fn consume_refresh_token(
        &self,
        token_hash: &str,
    ) -> ApplicationResult<Option<RefreshTokenRecord>> {
        Ok(lock(&self.refresh_tokens)?.remove(token_hash))
    }

    async fn purge_expired_refresh_tokens(&self, now: DateTime<Utc>) -> ApplicationResult<usize> {
        let mut refresh_tokens = lock(&self.refresh_tokens)?;
        Ok(purge(&mut refresh_tokens, now))
    }
}
