// tests/support/helpers.rs
use super::mocks::{CountingRandomBytes, FakeIdentityVerifier, ManualClock, TEST_PRIVATE_KEY, proof_for};
use axum::{
    Router,
    body::{self, Body},
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
    extract::ConnectInfo,
    response::Response,
};
use chrono::Duration;
use pantry_link::{
    application::{
        ports::{
            authorization_code::AuthorizationCodeStore,
            authorization_state::AuthorizationStateStore, random::RandomBytes,
            refresh_token::RefreshTokenStore, security::AccessTokenCodec, time::Clock,
        },
        services::{ApplicationPorts, ApplicationServices, LinkPolicy},
    },
    config::RateLimitSettings,
    domain::RedirectAllowlist,
    infrastructure::{
        security::token::{AccessTokenSettings, BiscuitAccessTokenCodec},
        store::InMemoryLinkStore,
    },
    presentation::http::{routes::build_router_with, state::HttpState},
};
use serde_json::Value;
use std::{net::SocketAddr, sync::Arc};
use tower::util::ServiceExt as _;

pub const CLIENT_ID: &str = "voice-app";
pub const REDIRECT_URI: &str = "https://voice.example.com/link/";
pub const SUBJECT: &str = "user-42";
pub const ISSUER: &str = "pantry-link";
pub const SCOPE: &str = "pantry:voice";

/// Parts of the wiring a test may replace.
pub struct TestOptions {
    pub clock: Arc<ManualClock>,
    pub random: Arc<dyn RandomBytes>,
    pub token_codec: Option<Arc<dyn AccessTokenCodec>>,
    pub stores: Option<(
        Arc<dyn AuthorizationStateStore>,
        Arc<dyn AuthorizationCodeStore>,
        Arc<dyn RefreshTokenStore>,
    )>,
    pub policy: LinkPolicy,
    pub rate_limit: Option<RateLimitSettings>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            clock: Arc::new(ManualClock::default()),
            random: Arc::new(CountingRandomBytes::default()),
            token_codec: None,
            stores: None,
            policy: LinkPolicy::default(),
            rate_limit: None,
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub services: Arc<ApplicationServices>,
    pub clock: Arc<ManualClock>,
    pub store: Arc<InMemoryLinkStore>,
}

pub fn test_allowlist() -> RedirectAllowlist {
    RedirectAllowlist::new()
        .with_client(CLIENT_ID, [REDIRECT_URI])
        .expect("valid allowlist")
        .with_client("other-app", ["https://other.example.com/cb"])
        .expect("valid allowlist")
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_options(TestOptions::default())
    }

    pub fn with_options(options: TestOptions) -> Self {
        let clock = options.clock;
        let dyn_clock: Arc<dyn Clock> = clock.clone();

        let token_codec = options.token_codec.unwrap_or_else(|| {
            Arc::new(
                BiscuitAccessTokenCodec::new(
                    TEST_PRIVATE_KEY,
                    AccessTokenSettings {
                        issuer: ISSUER.into(),
                        scope: SCOPE.into(),
                        ttl: Duration::hours(1),
                    },
                    Arc::clone(&dyn_clock),
                )
                .expect("valid signing key"),
            )
        });

        let store = Arc::new(InMemoryLinkStore::new());
        let (state_store, code_store, refresh_store) = options.stores.unwrap_or_else(|| {
            (
                store.clone() as Arc<dyn AuthorizationStateStore>,
                store.clone() as Arc<dyn AuthorizationCodeStore>,
                store.clone() as Arc<dyn RefreshTokenStore>,
            )
        });

        let services = Arc::new(ApplicationServices::new(
            test_allowlist(),
            ApplicationPorts {
                state_store,
                code_store,
                refresh_store,
                token_codec,
                identity_verifier: Arc::new(FakeIdentityVerifier),
                clock: dyn_clock,
                random: options.random,
            },
            options.policy,
        ));

        let state = HttpState::new(Arc::clone(&services), "https://link.example.com", SCOPE);

        Self {
            router: build_router_with(state, options.rate_limit, &[]),
            services,
            clock,
            store,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.expect("router is infallible")
    }

    /// Send with the peer address a connected socket would report.
    pub async fn send_from(&self, mut request: Request<Body>, peer: SocketAddr) -> Response {
        request.extensions_mut().insert(ConnectInfo(peer));
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn get_with_bearer(&self, uri: &str, token: &str) -> Response {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, payload: &Value) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response {
        let body = serde_urlencoded::to_string(fields).unwrap();
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// `GET /authorize` with the given query pairs.
    pub async fn authorize(&self, params: &[(&str, &str)]) -> Response {
        let query = serde_urlencoded::to_string(params).unwrap();
        self.get(&format!("/authorize?{query}")).await
    }

    pub async fn callback(&self, state: &str, identity_proof: &str) -> Response {
        self.post_json(
            "/authorize/callback",
            &serde_json::json!({ "state": state, "identityProof": identity_proof }),
        )
        .await
    }

    /// Run `/authorize` and the callback for [`SUBJECT`], returning the issued code.
    pub async fn obtain_code(&self, state: &str, pkce: Option<(&str, &str)>) -> String {
        let mut params = vec![
            ("response_type", "code"),
            ("client_id", CLIENT_ID),
            ("redirect_uri", REDIRECT_URI),
            ("state", state),
        ];
        if let Some((challenge, method)) = pkce {
            params.push(("code_challenge", challenge));
            params.push(("code_challenge_method", method));
        }

        let resp = self.authorize(&params).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = self.callback(state, &proof_for(SUBJECT)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let redirect_url = json["redirectUrl"].as_str().expect("redirectUrl");
        query_param(redirect_url, "code").expect("code in redirect")
    }

    pub async fn exchange_code(&self, code: &str, extra: &[(&str, &str)]) -> Response {
        let mut fields = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", CLIENT_ID),
        ];
        fields.extend_from_slice(extra);
        self.post_form("/token", &fields).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Response {
        self.post_form(
            "/token",
            &[("grant_type", "refresh_token"), ("refresh_token", refresh_token)],
        )
        .await
    }

    /// Full flow without PKCE; returns the token response body.
    pub async fn link(&self, state: &str) -> Value {
        let code = self.obtain_code(state, None).await;
        let resp = self.exchange_code(&code, &[]).await;
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await
    }
}

pub fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).ok()?;
    pairs.into_iter().find(|(k, _)| k == name).map(|(_, v)| v)
}

pub async fn body_bytes(resp: Response) -> Vec<u8> {
    body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub async fn body_json(resp: Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).expect("json body")
}

pub async fn body_text(resp: Response) -> String {
    String::from_utf8(body_bytes(resp).await).expect("utf-8 body")
}

/// Assert an OAuth error body with the expected status, code and (optionally) description.
pub async fn assert_oauth_error(
    resp: Response,
    expected_status: StatusCode,
    expected_error: &str,
    expected_description: Option<&str>,
) {
    assert_eq!(resp.status(), expected_status);
    assert_eq!(
        resp.headers().get("cache-control").and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    let json = body_json(resp).await;
    assert_eq!(json["error"], expected_error, "unexpected body: {json}");
    if let Some(description) = expected_description {
        assert_eq!(json["error_description"], description, "unexpected body: {json}");
    }
}
