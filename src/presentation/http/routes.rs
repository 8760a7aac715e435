// src/presentation/http/routes.rs
use crate::config::RateLimitSettings;
use crate::presentation::http::state::HttpState;
use crate::presentation::http::{
    controllers::{authorize, discovery, token, userinfo},
    middleware::rate_limit::rate_limit_layer,
    openapi::{self, StatusResponse},
};
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Router without rate limiting and with permissive CORS.
pub fn build_router(state: HttpState) -> Router {
    build_router_with(state, None, &[])
}

/// `rate_limit` of `None` disables limiting; an empty `allowed_origins` allows any origin.
pub fn build_router_with(
    state: HttpState,
    rate_limit: Option<RateLimitSettings>,
    allowed_origins: &[String],
) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let mut oauth = Router::new()
        .route("/authorize", get(authorize::authorize))
        .route("/authorize/callback", post(authorize::authorize_callback))
        .route("/token", post(token::token));

    if let Some(layer) = rate_limit.and_then(rate_limit_layer) {
        oauth = oauth.layer(layer);
    }

    Router::new()
        .merge(openapi::docs_router())
        .merge(oauth)
        .route("/health", get(health))
        .route("/userinfo", get(userinfo::userinfo))
        .route(
            "/.well-known/oauth-authorization-server",
            get(discovery::authorization_server_metadata),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = crate::presentation::http::openapi::StatusResponse)
    ),
    tag = "System"
)]
pub async fn health() -> axum::Json<StatusResponse> {
    axum::Json(StatusResponse {
        status: "ok".into(),
    })
}
