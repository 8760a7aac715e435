// src/presentation/http/openapi.rs
use axum::{Extension, Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use utoipa::openapi::{
    Components, OpenApi as OpenApiDocument,
    security::{Http, HttpAuthScheme, SecurityScheme},
    server::Server,
};
use utoipa::{Modify, OpenApi, ToSchema};

use super::state::HttpState;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::authorize::authorize,
        crate::presentation::http::controllers::authorize::authorize_callback,
        crate::presentation::http::controllers::token::token,
        crate::presentation::http::controllers::userinfo::userinfo,
        crate::presentation::http::controllers::discovery::authorization_server_metadata,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::error::OAuthErrorResponse,
            crate::presentation::http::controllers::authorize::AuthorizeCallbackRequest,
            crate::presentation::http::controllers::authorize::AuthorizeCallbackResponse,
            crate::presentation::http::controllers::token::TokenRequest,
            crate::presentation::http::controllers::discovery::AuthorizationServerMetadata,
            crate::application::dto::TokenResponseDto,
            crate::application::dto::AccessTokenClaims
        )
    ),
    tags(
        (name = "OAuth", description = "Account linking endpoints"),
        (name = "System", description = "System level endpoints")
    ),
    modifiers(&ApiDocCustomizer),
    info(
        title = "Pantry Link API",
        description = "OAuth2 account linking for voice assistants",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct ApiDocCustomizer;

impl Modify for ApiDocCustomizer {
    fn modify(&self, openapi: &mut OpenApiDocument) {
        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("Biscuit".into());
        openapi
            .components
            .get_or_insert_with(Components::default)
            .add_security_scheme("bearerAuth", SecurityScheme::Http(bearer));
    }
}

/// The API document advertising `public_base_url` as its only server.
pub fn document_for(public_base_url: &str) -> OpenApiDocument {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(public_base_url.trim_end_matches('/'))]);
    doc
}

async fn serve_openapi(Extension(state): Extension<HttpState>) -> Json<OpenApiDocument> {
    Json(document_for(&state.public_base_url))
}

pub fn docs_router() -> Router {
    Router::new().route(OPENAPI_PATH, get(serve_openapi))
}

/// Pretty-print the document for `public_base_url` to `path`, creating parent
/// directories as needed.
pub fn write_openapi_snapshot(path: &Path, public_base_url: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = document_for(public_base_url).to_pretty_json()?;
    fs::write(path, json)
}
