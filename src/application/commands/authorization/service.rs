use std::sync::Arc;

use chrono::Duration;

use crate::application::ports::{
    authorization_code::AuthorizationCodeStore, authorization_state::AuthorizationStateStore,
    random::RandomBytes, security::IdentityVerifier, time::Clock,
};
use crate::domain::RedirectAllowlist;

/// Default lifetime of pending states and authorization codes.
pub const DEFAULT_AUTHORIZATION_TTL_SECS: i64 = 600;

pub struct AuthorizationCommandService {
    pub(super) allowlist: Arc<RedirectAllowlist>,
    pub(super) state_store: Arc<dyn AuthorizationStateStore>,
    pub(super) code_store: Arc<dyn AuthorizationCodeStore>,
    pub(super) identity_verifier: Arc<dyn IdentityVerifier>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) random: Arc<dyn RandomBytes>,
    pub(super) authorization_ttl: Duration,
}

impl AuthorizationCommandService {
    pub fn new(
        allowlist: Arc<RedirectAllowlist>,
        state_store: Arc<dyn AuthorizationStateStore>,
        code_store: Arc<dyn AuthorizationCodeStore>,
        identity_verifier: Arc<dyn IdentityVerifier>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomBytes>,
        authorization_ttl: Duration,
    ) -> Self {
        Self {
            allowlist,
            state_store,
            code_store,
            identity_verifier,
            clock,
            random,
            authorization_ttl,
        }
    }

    pub fn is_valid_redirect(&self, client_id: &str, redirect_uri: &str) -> bool {
        self.allowlist.is_valid_redirect(client_id, redirect_uri)
    }
}
