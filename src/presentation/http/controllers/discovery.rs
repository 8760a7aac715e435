// src/presentation/http/controllers/discovery.rs
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// RFC 8414 authorization server metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorizationServerMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
    pub response_types_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
    pub code_challenge_methods_supported: Vec<String>,
    pub token_endpoint_auth_methods_supported: Vec<String>,
    pub scopes_supported: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/.well-known/oauth-authorization-server",
    responses(
        (status = 200, description = "Authorization server metadata", body = AuthorizationServerMetadata),
    ),
    security([]),
    tag = "OAuth"
)]
pub async fn authorization_server_metadata(
    Extension(state): Extension<HttpState>,
) -> Json<AuthorizationServerMetadata> {
    Json(AuthorizationServerMetadata {
        issuer: state.public_base_url.to_string(),
        authorization_endpoint: state.endpoint("/authorize"),
        token_endpoint: state.endpoint("/token"),
        userinfo_endpoint: state.endpoint("/userinfo"),
        response_types_supported: vec!["code".into()],
        grant_types_supported: vec!["authorization_code".into(), "refresh_token".into()],
        code_challenge_methods_supported: vec!["S256".into(), "plain".into()],
        // public clients only
        token_endpoint_auth_methods_supported: vec!["none".into()],
        scopes_supported: vec![state.scope.to_string()],
    })
}
