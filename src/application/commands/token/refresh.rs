use super::TokenCommandService;
use crate::{
    application::{
        commands::authorization::require_field,
        dto::TokenResponseDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::link::Expiring,
};

#[derive(Debug, Clone, Default)]
pub struct RefreshTokenGrant {
    pub refresh_token: Option<String>,
    pub client_id: Option<String>,
}

/// Storage key for a raw refresh token (hex BLAKE3 digest).
pub fn hash_refresh_token(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

impl TokenCommandService {
    /// Single-use rotation: the presented token is consumed whether or not the
    /// rest of the exchange succeeds.
    pub async fn rotate_refresh_token(
        &self,
        grant: RefreshTokenGrant,
    ) -> ApplicationResult<TokenResponseDto> {
        let refresh_token = require_field(grant.refresh_token, "refresh_token")?;

        let stored = self
            .refresh_store
            .consume_refresh_token(&hash_refresh_token(&refresh_token))
            .await?
            .ok_or_else(|| reject("Invalid refresh token"))?;

        if stored.is_expired(self.clock.now()) {
            return Err(reject("Refresh token expired"));
        }

        let client_id = grant
            .client_id
            .filter(|c| !c.is_empty())
            .unwrap_or(stored.client_id);

        let response = self.issue_token_pair(&stored.subject, &client_id).await?;
        tracing::info!(client_id = %client_id, grant_type = "refresh_token", "refresh token rotated");
        Ok(response)
    }
}

fn reject(reason: &'static str) -> ApplicationError {
    tracing::warn!(grant_type = "refresh_token", reason, "grant rejected");
    ApplicationError::invalid_grant(reason)
}
