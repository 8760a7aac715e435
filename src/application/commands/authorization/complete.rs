use super::{AuthorizationCommandService, IssueCodeCommand, require_field};
use crate::{
    application::error::{ApplicationError, ApplicationResult},
    domain::link::Expiring,
};

#[derive(Debug, Clone, Default)]
pub struct CompleteAuthorizationCommand {
    pub state: Option<String>,
    pub identity_proof: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CompletedAuthorization {
    /// Client redirect carrying `code` and `state`.
    pub redirect_url: String,
    pub code: String,
}

impl AuthorizationCommandService {
    pub async fn complete_authorization(
        &self,
        command: CompleteAuthorizationCommand,
    ) -> ApplicationResult<CompletedAuthorization> {
        let state = require_field(command.state, "state")?;
        let identity_proof = require_field(command.identity_proof, "identityProof")?;

        // Removed on read: an expired or rejected state is never reusable.
        let pending = self
            .state_store
            .take_state(&state)
            .await?
            .ok_or_else(|| ApplicationError::invalid_state("Invalid or expired state"))?;

        if pending.is_expired(self.clock.now()) {
            tracing::info!(client_id = %pending.client_id, "authorization state expired");
            return Err(ApplicationError::invalid_state("State expired"));
        }

        if !self
            .allowlist
            .is_valid_redirect(&pending.client_id, &pending.redirect_uri)
        {
            tracing::warn!(
                client_id = %pending.client_id,
                "stored redirect_uri no longer allowed"
            );
            return Err(ApplicationError::validation("invalid redirect_uri"));
        }

        let subject = self
            .identity_verifier
            .verify_identity(&identity_proof)
            .await
            .map_err(|err| match err {
                ApplicationError::IdentityVerification(_) => err,
                other => ApplicationError::identity(other.to_string()),
            })?;

        let redirect_uri = pending.redirect_uri.clone();
        let code = self
            .issue_code(IssueCodeCommand {
                subject,
                client_id: pending.client_id,
                redirect_uri: pending.redirect_uri,
                code_challenge: pending.code_challenge,
                code_challenge_method: pending.code_challenge_method,
            })
            .await?;

        let redirect_url = build_redirect_url(&redirect_uri, &code, &state)?;
        Ok(CompletedAuthorization { redirect_url, code })
    }
}

fn build_redirect_url(redirect_uri: &str, code: &str, state: &str) -> ApplicationResult<String> {
    let query = serde_urlencoded::to_string([("code", code), ("state", state)])
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
    let separator = if redirect_uri.contains('?') { '&' } else { '?' };
    Ok(format!("{redirect_uri}{separator}{query}"))
}
