use super::TokenCommandService;
use crate::{
    application::{
        commands::authorization::require_field,
        dto::TokenResponseDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{link::Expiring, verify_pkce},
};

#[derive(Debug, Clone, Default)]
pub struct AuthorizationCodeGrant {
    pub code: Option<String>,
    pub code_verifier: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
}

impl TokenCommandService {
    pub async fn exchange_authorization_code(
        &self,
        grant: AuthorizationCodeGrant,
    ) -> ApplicationResult<TokenResponseDto> {
        let code = require_field(grant.code, "code")?;
        let client_id = require_field(grant.client_id, "client_id")?;

        // Deleted before any validation so concurrent or repeated attempts
        // with the same code observe absence.
        let stored = self
            .code_store
            .consume_code(&code)
            .await?
            .ok_or_else(|| reject(&client_id, "Invalid authorization code"))?;

        if stored.is_expired(self.clock.now()) {
            return Err(reject(&client_id, "Authorization code expired"));
        }

        if stored.client_id != client_id {
            return Err(reject(&client_id, "client_id mismatch"));
        }

        if let Some(redirect_uri) = grant.redirect_uri.as_deref().filter(|r| !r.is_empty()) {
            if redirect_uri != stored.redirect_uri {
                return Err(reject(&client_id, "redirect_uri mismatch"));
            }
        }

        if let Some(challenge) = stored.code_challenge.as_deref() {
            let verifier = grant
                .code_verifier
                .as_deref()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| reject(&client_id, "code_verifier required"))?;
            let method = stored.code_challenge_method.as_deref().unwrap_or("plain");

            if !verify_pkce(method, verifier, challenge) {
                return Err(reject(&client_id, "PKCE verification failed"));
            }
        }

        let response = self.issue_token_pair(&stored.subject, &client_id).await?;
        tracing::info!(client_id = %client_id, grant_type = "authorization_code", "tokens issued");
        Ok(response)
    }
}

fn reject(client_id: &str, reason: &'static str) -> ApplicationError {
    tracing::warn!(client_id = %client_id, grant_type = "authorization_code", reason, "grant rejected");
    ApplicationError::invalid_grant(reason)
}
