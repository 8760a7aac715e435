// src/presentation/http/extractors.rs
use crate::{
    application::{dto::AccessTokenClaims, error::ApplicationError},
    presentation::http::state::HttpState,
};
use axum::{
    Form, Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::CONTENT_TYPE, request::Parts},
};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use serde::de::DeserializeOwned;

use super::error::{HttpError, OAuthError};

/// Verified bearer token claims.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AccessTokenClaims);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let app_state = parts
            .extensions
            .get::<HttpState>()
            .cloned()
            .ok_or_else(|| {
                HttpError::from_error(ApplicationError::infrastructure(
                    "application state missing",
                ))
            })?;

        let header = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| HttpError::unauthorized("missing bearer token"))?;

        let claims = app_state
            .services
            .verify_access_token(header.token())
            .await
            .map_err(HttpError::from_error)?;

        Ok(Self(claims))
    }
}

/// Token endpoint body: `application/x-www-form-urlencoded` or JSON.
#[derive(Debug, Clone)]
pub struct OAuthForm<T>(pub T);

impl<T, S> FromRequest<S> for OAuthForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = OAuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| OAuthError::invalid_request(rejection.body_text()))?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| OAuthError::invalid_request(rejection.body_text()))?;
            Ok(Self(value))
        }
    }
}
