use super::{AuthorizationCodeGrant, RefreshTokenGrant, TokenCommandService};
use crate::application::{
    dto::TokenResponseDto,
    error::{ApplicationError, ApplicationResult},
};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantType {
    AuthorizationCode,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl FromStr for GrantType {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authorization_code" => Ok(Self::AuthorizationCode),
            "refresh_token" => Ok(Self::RefreshToken),
            "" => Err(ApplicationError::validation("missing grant_type")),
            other => Err(ApplicationError::UnsupportedGrantType(other.to_owned())),
        }
    }
}

/// Raw `/token` parameters. Which fields matter depends on `grant_type`.
#[derive(Debug, Clone, Default)]
pub struct TokenRequestCommand {
    pub grant_type: Option<String>,
    pub code: Option<String>,
    pub code_verifier: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub refresh_token: Option<String>,
}

impl TokenCommandService {
    pub async fn exchange(&self, command: TokenRequestCommand) -> ApplicationResult<TokenResponseDto> {
        let grant_type: GrantType = command.grant_type.as_deref().unwrap_or_default().parse()?;
        tracing::debug!(grant_type = grant_type.as_str(), "token request");

        match grant_type {
            GrantType::AuthorizationCode => {
                self.exchange_authorization_code(AuthorizationCodeGrant {
                    code: command.code,
                    code_verifier: command.code_verifier,
                    client_id: command.client_id,
                    redirect_uri: command.redirect_uri,
                })
                .await
            }
            GrantType::RefreshToken => {
                self.rotate_refresh_token(RefreshTokenGrant {
                    refresh_token: command.refresh_token,
                    client_id: command.client_id,
                })
                .await
            }
        }
    }
}
