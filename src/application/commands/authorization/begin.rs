use super::{AuthorizationCommandService, require_field};
use crate::{
    application::error::{ApplicationError, ApplicationResult},
    domain::{AuthorizationState, PkceMethod},
};

#[derive(Debug, Clone, Default)]
pub struct BeginAuthorizationCommand {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

/// What the identity-collection step needs to continue the flow.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub state: String,
    pub client_id: String,
}

impl AuthorizationCommandService {
    pub async fn begin_authorization(
        &self,
        command: BeginAuthorizationCommand,
    ) -> ApplicationResult<PendingAuthorization> {
        match command.response_type.as_deref() {
            Some("code") => {}
            None | Some("") => return Err(ApplicationError::validation("missing response_type")),
            Some(other) => return Err(ApplicationError::UnsupportedResponseType(other.to_owned())),
        }

        let client_id = require_field(command.client_id, "client_id")?;
        let redirect_uri = require_field(command.redirect_uri, "redirect_uri")?;
        let state = require_field(command.state, "state")?;

        if !self.allowlist.is_valid_redirect(&client_id, &redirect_uri) {
            tracing::warn!(client_id = %client_id, "rejected authorization: redirect_uri not allowed");
            return Err(ApplicationError::validation("invalid client_id or redirect_uri"));
        }

        let (code_challenge, code_challenge_method) =
            normalize_pkce(command.code_challenge, command.code_challenge_method)?;

        let uses_pkce = code_challenge.is_some();
        let record = AuthorizationState {
            client_id: client_id.clone(),
            redirect_uri,
            code_challenge,
            code_challenge_method,
            expires_at: self.clock.expiry_after(self.authorization_ttl)?,
        };
        self.state_store.put_state(&state, record).await?;

        tracing::info!(
            client_id = %client_id,
            pkce = uses_pkce,
            "authorization state created"
        );

        Ok(PendingAuthorization { state, client_id })
    }
}

/// An empty challenge counts as absent. A present challenge without a method
/// defaults to `plain`.
fn normalize_pkce(
    challenge: Option<String>,
    method: Option<String>,
) -> ApplicationResult<(Option<String>, Option<String>)> {
    let Some(challenge) = challenge.filter(|c| !c.is_empty()) else {
        return Ok((None, None));
    };

    let method = match method.filter(|m| !m.is_empty()) {
        Some(raw) => raw.parse::<PkceMethod>()?,
        None => PkceMethod::Plain,
    };

    Ok((Some(challenge), Some(method.as_str().to_owned())))
}
