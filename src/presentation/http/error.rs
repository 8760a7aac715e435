// src/presentation/http/error.rs
use crate::application::{ApplicationResult, error::ApplicationError};
use axum::{
    Json,
    http::{
        HeaderValue, StatusCode,
        header::{CACHE_CONTROL, PRAGMA},
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// `{error}` JSON error used by the callback and bearer-protected endpoints.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Validation(msg)
            | ApplicationError::InvalidState(msg)
            | ApplicationError::InvalidGrant(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            ApplicationError::UnsupportedResponseType(value) => Self::new(
                StatusCode::BAD_REQUEST,
                format!("unsupported response_type: {value}"),
            ),
            ApplicationError::UnsupportedGrantType(value) => Self::new(
                StatusCode::BAD_REQUEST,
                format!("unsupported grant_type: {value}"),
            ),
            ApplicationError::Domain(domain_err) => {
                Self::new(StatusCode::BAD_REQUEST, domain_err.to_string())
            }
            ApplicationError::InvalidToken(_) => {
                Self::new(StatusCode::UNAUTHORIZED, "invalid_token".into())
            }
            ApplicationError::TokenExpired => {
                Self::new(StatusCode::UNAUTHORIZED, "token_expired".into())
            }
            ApplicationError::IdentityVerification(msg) => {
                tracing::warn!(reason = %msg, "identity verification failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Identity verification failed".into(),
                )
            }
            ApplicationError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.into(),
                )
            }
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message.into())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn new(status: StatusCode, message: String) -> Self {
        Self { status, message }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            error: self.message,
        };
        (self.status, Json(payload)).into_response()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}

/// RFC 6749 section 5.2 error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthErrorCode {
    InvalidRequest,
    InvalidGrant,
    UnsupportedGrantType,
    ServerError,
}

impl OAuthErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidGrant => "invalid_grant",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::ServerError => "server_error",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error body of the token endpoint. Never carries internal detail.
#[derive(Debug)]
pub struct OAuthError {
    code: OAuthErrorCode,
    description: Option<String>,
}

impl OAuthError {
    pub fn new(code: OAuthErrorCode, description: Option<String>) -> Self {
        Self { code, description }
    }

    pub fn invalid_request(description: impl Into<String>) -> Self {
        Self::new(OAuthErrorCode::InvalidRequest, Some(description.into()))
    }

    pub fn code(&self) -> OAuthErrorCode {
        self.code
    }

    pub fn from_error(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Validation(msg) => Self::invalid_request(msg),
            ApplicationError::Domain(domain_err) => Self::invalid_request(domain_err.to_string()),
            ApplicationError::InvalidGrant(msg) => {
                Self::new(OAuthErrorCode::InvalidGrant, Some(msg))
            }
            ApplicationError::UnsupportedGrantType(value) => Self::new(
                OAuthErrorCode::UnsupportedGrantType,
                Some(format!("grant_type {value} is not supported")),
            ),
            other => {
                tracing::error!(error = %other, "token endpoint failure");
                Self::new(
                    OAuthErrorCode::ServerError,
                    Some(INTERNAL_ERROR_MESSAGE.into()),
                )
            }
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OAuthErrorResponse {
    #[schema(example = "invalid_grant")]
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl IntoResponse for OAuthError {
    fn into_response(self) -> Response {
        let body = OAuthErrorResponse {
            error: self.code.as_str().to_owned(),
            error_description: self.description,
        };
        let mut response = (self.code.status(), Json(body)).into_response();
        no_store(&mut response);
        response
    }
}

/// Token responses must never be cached (RFC 6749 section 5.1).
pub fn no_store(response: &mut Response) {
    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
}

/// Plain-text rejection rendered by `GET /authorize`.
#[derive(Debug)]
pub struct PlainTextError {
    status: StatusCode,
    message: String,
}

impl PlainTextError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn from_error(err: ApplicationError) -> Self {
        let HttpError { status, message } = HttpError::from_error(err);
        Self { status, message }
    }
}

impl IntoResponse for PlainTextError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}
