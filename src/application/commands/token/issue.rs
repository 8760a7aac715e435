use super::{TokenCommandService, hash_refresh_token};
use crate::{
    application::{dto::TokenResponseDto, error::ApplicationResult, ports::random::opaque_token},
    domain::RefreshTokenRecord,
};

impl TokenCommandService {
    /// Sign an access token and persist a brand-new refresh token for the pair.
    pub(super) async fn issue_token_pair(
        &self,
        subject: &str,
        client_id: &str,
    ) -> ApplicationResult<TokenResponseDto> {
        let access = self.token_codec.sign(subject, client_id).await?;

        let refresh_token = opaque_token(self.random.as_ref())?;
        let record = RefreshTokenRecord {
            subject: subject.to_owned(),
            client_id: client_id.to_owned(),
            expires_at: self.clock.expiry_after(self.refresh_ttl)?,
        };
        self.refresh_store
            .store_refresh_token(&hash_refresh_token(&refresh_token), record)
            .await?;

        Ok(TokenResponseDto::bearer(access, refresh_token))
    }
}
