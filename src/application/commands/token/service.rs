use std::sync::Arc;

use chrono::Duration;

use crate::application::ports::{
    authorization_code::AuthorizationCodeStore, random::RandomBytes,
    refresh_token::RefreshTokenStore, security::AccessTokenCodec, time::Clock,
};

/// 30 days.
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: i64 = 60 * 60 * 24 * 30;

pub struct TokenCommandService {
    pub(super) code_store: Arc<dyn AuthorizationCodeStore>,
    pub(super) refresh_store: Arc<dyn RefreshTokenStore>,
    pub(super) token_codec: Arc<dyn AccessTokenCodec>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) random: Arc<dyn RandomBytes>,
    pub(super) refresh_ttl: Duration,
}

impl TokenCommandService {
    pub fn new(
        code_store: Arc<dyn AuthorizationCodeStore>,
        refresh_store: Arc<dyn RefreshTokenStore>,
        token_codec: Arc<dyn AccessTokenCodec>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomBytes>,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            code_store,
            refresh_store,
            token_codec,
            clock,
            random,
            refresh_ttl,
        }
    }
}
