// src/presentation/http/controllers/token.rs
use crate::application::{commands::token::TokenRequestCommand, dto::TokenResponseDto};
use crate::presentation::http::error::{OAuthError, OAuthErrorResponse, no_store};
use crate::presentation::http::extractors::OAuthForm;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TokenRequest {
    #[schema(example = "authorization_code")]
    pub grant_type: Option<String>,
    pub code: Option<String>,
    pub code_verifier: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub refresh_token: Option<String>,
}

impl From<TokenRequest> for TokenRequestCommand {
    fn from(request: TokenRequest) -> Self {
        Self {
            grant_type: request.grant_type,
            code: request.code,
            code_verifier: request.code_verifier,
            client_id: request.client_id,
            redirect_uri: request.redirect_uri,
            refresh_token: request.refresh_token,
        }
    }
}

#[utoipa::path(
    post,
    path = "/token",
    request_body(
        content = TokenRequest,
        content_type = "application/x-www-form-urlencoded",
        description = "Form or JSON encoded token request"
    ),
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponseDto),
        (status = 400, description = "invalid_request, invalid_grant or unsupported_grant_type", body = OAuthErrorResponse),
        (status = 500, description = "server_error", body = OAuthErrorResponse)
    ),
    tag = "OAuth"
)]
pub async fn token(
    Extension(state): Extension<HttpState>,
    OAuthForm(request): OAuthForm<TokenRequest>,
) -> Result<Response, OAuthError> {
    let tokens = state
        .services
        .token_commands
        .exchange(request.into())
        .await
        .map_err(OAuthError::from_error)?;

    let mut response = Json(tokens).into_response();
    no_store(&mut response);
    Ok(response)
}
