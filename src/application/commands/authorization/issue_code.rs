use super::AuthorizationCommandService;
use crate::{
    application::{error::ApplicationResult, ports::random::opaque_token},
    domain::AuthorizationCode,
};

#[derive(Debug, Clone)]
pub struct IssueCodeCommand {
    pub subject: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

impl AuthorizationCommandService {
    /// Mint a one-time authorization code. Uniqueness rests on the 256 bits of
    /// entropy from the injected random source.
    pub async fn issue_code(&self, command: IssueCodeCommand) -> ApplicationResult<String> {
        let code = opaque_token(self.random.as_ref())?;
        let client_id = command.client_id.clone();

        let record = AuthorizationCode {
            subject: command.subject,
            client_id: command.client_id,
            redirect_uri: command.redirect_uri,
            code_challenge: command.code_challenge,
            code_challenge_method: command.code_challenge_method,
            expires_at: self.clock.expiry_after(self.authorization_ttl)?,
        };
        self.code_store.create_code(&code, record).await?;

        tracing::info!(client_id = %client_id, "authorization code issued");
        Ok(code)
    }
}
