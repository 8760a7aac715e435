// src/presentation/http/controllers/authorize.rs
use crate::application::commands::authorization::{
    BeginAuthorizationCommand, CompleteAuthorizationCommand,
};
use crate::presentation::http::error::{
    ErrorResponse, HttpError, HttpResult, IntoHttpResult, PlainTextError,
};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{
        Query,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Html,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AuthorizeParams {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

impl From<AuthorizeParams> for BeginAuthorizationCommand {
    fn from(params: AuthorizeParams) -> Self {
        Self {
            response_type: params.response_type,
            client_id: params.client_id,
            redirect_uri: params.redirect_uri,
            state: params.state,
            code_challenge: params.code_challenge,
            code_challenge_method: params.code_challenge_method,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeCallbackRequest {
    pub identity_proof: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeCallbackResponse {
    pub redirect_url: String,
}

#[utoipa::path(
    get,
    path = "/authorize",
    params(AuthorizeParams),
    responses(
        (status = 200, description = "Identity collection page", content_type = "text/html", body = String),
        (status = 400, description = "Missing or invalid parameters", content_type = "text/plain", body = String)
    ),
    tag = "OAuth"
)]
pub async fn authorize(
    Extension(state): Extension<HttpState>,
    params: Result<Query<AuthorizeParams>, QueryRejection>,
) -> Result<Html<String>, PlainTextError> {
    let Query(params) = params.map_err(|rejection| PlainTextError::bad_request(rejection.body_text()))?;

    let pending = state
        .services
        .authorization_commands
        .begin_authorization(params.into())
        .await
        .map_err(PlainTextError::from_error)?;

    Ok(Html(render_identity_page(
        &state.endpoint("/authorize/callback"),
        &pending.client_id,
        &pending.state,
    )))
}

#[utoipa::path(
    post,
    path = "/authorize/callback",
    request_body = AuthorizeCallbackRequest,
    responses(
        (status = 200, description = "Authorization code issued", body = AuthorizeCallbackResponse),
        (status = 400, description = "Missing fields or invalid state", body = ErrorResponse),
        (status = 500, description = "Identity verification or storage failure", body = ErrorResponse)
    ),
    tag = "OAuth"
)]
pub async fn authorize_callback(
    Extension(state): Extension<HttpState>,
    payload: Result<Json<AuthorizeCallbackRequest>, JsonRejection>,
) -> HttpResult<Json<AuthorizeCallbackResponse>> {
    let Json(payload) = payload.map_err(|rejection| HttpError::bad_request(rejection.body_text()))?;

    let completed = state
        .services
        .authorization_commands
        .complete_authorization(CompleteAuthorizationCommand {
            state: payload.state,
            identity_proof: payload.identity_proof,
        })
        .await
        .into_http()?;

    Ok(Json(AuthorizeCallbackResponse {
        redirect_url: completed.redirect_url,
    }))
}

fn render_identity_page(callback_url: &str, client_id: &str, state: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Link your pantry</title>
</head>
<body>
    <h1>Link your pantry</h1>
    <p><strong>{client}</strong> is asking to access your pantry.</p>
    <form id="link" data-callback="{callback}">
        <input type="hidden" name="state" value="{state}">
        <label>Sign-in proof <input name="identityProof" autocomplete="off" required></label>
        <button type="submit">Allow</button>
    </form>
    <p id="error" role="alert"></p>
    <script>
    document.getElementById("link").addEventListener("submit", async (event) => {{
        event.preventDefault();
        const form = event.target;
        const response = await fetch(form.dataset.callback, {{
            method: "POST",
            headers: {{ "Content-Type": "application/json" }},
            body: JSON.stringify({{
                state: form.state.value,
                identityProof: form.identityProof.value
            }})
        }});
        const body = await response.json();
        if (response.ok) {{
            window.location.assign(body.redirectUrl);
        }} else {{
            document.getElementById("error").textContent = body.error;
        }}
    }});
    </script>
</body>
</html>"#,
        client = html_escape(client_id),
        callback = html_escape(callback_url),
        state = html_escape(state),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
