// src/presentation/http/controllers/userinfo.rs
use crate::application::dto::AccessTokenClaims;
use crate::presentation::http::error::ErrorResponse;
use crate::presentation::http::extractors::Authenticated;
use axum::Json;

/// Claims of the presented access token.
#[utoipa::path(
    get,
    path = "/userinfo",
    responses(
        (status = 200, description = "Verified token claims", body = AccessTokenClaims),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "OAuth"
)]
pub async fn userinfo(Authenticated(claims): Authenticated) -> Json<AccessTokenClaims> {
    Json(claims)
}
