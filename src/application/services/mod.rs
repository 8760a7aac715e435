// src/application/services/mod.rs
use std::sync::Arc;

use chrono::Duration;

use crate::{
    application::{
        ApplicationResult,
        commands::{
            authorization::{AuthorizationCommandService, DEFAULT_AUTHORIZATION_TTL_SECS},
            token::{DEFAULT_REFRESH_TOKEN_TTL_SECS, TokenCommandService},
        },
        dto::AccessTokenClaims,
        ports::{
            AccessTokenCodecPort, AuthorizationCodeStorePort, AuthorizationStateStorePort,
            ClockPort, IdentityVerifierPort, RandomBytesPort, RefreshTokenStorePort,
        },
    },
    domain::RedirectAllowlist,
};

/// Lifetimes of the persisted link records.
#[derive(Debug, Clone, Copy)]
pub struct LinkPolicy {
    pub authorization_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            authorization_ttl: Duration::seconds(DEFAULT_AUTHORIZATION_TTL_SECS),
            refresh_token_ttl: Duration::seconds(DEFAULT_REFRESH_TOKEN_TTL_SECS),
        }
    }
}

/// Injected collaborators for [`ApplicationServices::new`].
pub struct ApplicationPorts {
    pub state_store: Arc<AuthorizationStateStorePort>,
    pub code_store: Arc<AuthorizationCodeStorePort>,
    pub refresh_store: Arc<RefreshTokenStorePort>,
    pub token_codec: Arc<AccessTokenCodecPort>,
    pub identity_verifier: Arc<IdentityVerifierPort>,
    pub clock: Arc<ClockPort>,
    pub random: Arc<RandomBytesPort>,
}

/// Records removed by one expiry sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub states: usize,
    pub codes: usize,
    pub refresh_tokens: usize,
}

impl PurgeReport {
    pub fn total(&self) -> usize {
        self.states + self.codes + self.refresh_tokens
    }
}

pub struct ApplicationServices {
    pub authorization_commands: Arc<AuthorizationCommandService>,
    pub token_commands: Arc<TokenCommandService>,
    token_codec: Arc<AccessTokenCodecPort>,
    state_store: Arc<AuthorizationStateStorePort>,
    code_store: Arc<AuthorizationCodeStorePort>,
    refresh_store: Arc<RefreshTokenStorePort>,
    clock: Arc<ClockPort>,
}

impl ApplicationServices {
    pub fn new(allowlist: RedirectAllowlist, ports: ApplicationPorts, policy: LinkPolicy) -> Self {
        let authorization_commands = Arc::new(AuthorizationCommandService::new(
            Arc::new(allowlist),
            Arc::clone(&ports.state_store),
            Arc::clone(&ports.code_store),
            Arc::clone(&ports.identity_verifier),
            Arc::clone(&ports.clock),
            Arc::clone(&ports.random),
            policy.authorization_ttl,
        ));

        let token_commands = Arc::new(TokenCommandService::new(
            Arc::clone(&ports.code_store),
            Arc::clone(&ports.refresh_store),
            Arc::clone(&ports.token_codec),
            Arc::clone(&ports.clock),
            Arc::clone(&ports.random),
            policy.refresh_token_ttl,
        ));

        Self {
            authorization_commands,
            token_commands,
            token_codec: ports.token_codec,
            state_store: ports.state_store,
            code_store: ports.code_store,
            refresh_store: ports.refresh_store,
            clock: ports.clock,
        }
    }

    /// Downstream contract: the bearer token's subject and scope, or an error.
    pub async fn verify_access_token(&self, token: &str) -> ApplicationResult<AccessTokenClaims> {
        self.token_codec.verify(token).await
    }

    /// Evict expired records from all three namespaces. Every read path checks
    /// expiry on its own, so this only reclaims storage.
    pub async fn purge_expired(&self) -> ApplicationResult<PurgeReport> {
        let now = self.clock.now();
        Ok(PurgeReport {
            states: self.state_store.purge_expired_states(now).await?,
            codes: self.code_store.purge_expired_codes(now).await?,
            refresh_tokens: self.refresh_store.purge_expired_refresh_tokens(now).await?,
        })
    }
}
