use axum::http::StatusCode;
use chrono::Duration;

mod support;

use pantry_link::{
    application::{
        ports::{authorization_state::AuthorizationStateStore, time::Clock},
        services::LinkPolicy,
    },
    domain::AuthorizationState,
};
use support::{
    CLIENT_ID, REDIRECT_URI, SCOPE, SUBJECT, TestApp, TestOptions, body_json, body_text,
    proof_for, query_param,
};

#[tokio::test]
async fn voice_app_links_and_code_is_single_use() {
    let app = TestApp::new();

    let resp = app
        .authorize(&[
            ("client_id", "voice-app"),
            ("redirect_uri", "https://voice.example.com/link/"),
            ("state", "abc123"),
            ("response_type", "code"),
        ])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_text(resp).await;
    assert!(page.contains("abc123"));
    assert!(page.contains("https://link.example.com/authorize/callback"));

    let resp = app.callback("abc123", &proof_for(SUBJECT)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let redirect_url = json["redirectUrl"].as_str().expect("redirectUrl").to_owned();
    assert!(redirect_url.starts_with("https://voice.example.com/link/?code="));
    assert_eq!(query_param(&redirect_url, "state").as_deref(), Some("abc123"));
    let code = query_param(&redirect_url, "code").expect("code");

    let fields = [
        ("grant_type", "authorization_code"),
        ("code", code.as_str()),
        ("client_id", "voice-app"),
    ];
    let resp = app.post_form("/token", &fields).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tokens = body_json(resp).await;
    assert_eq!(tokens["token_type"], "Bearer");
    assert_eq!(tokens["expires_in"], 3600);
    assert!(!tokens["access_token"].as_str().unwrap().is_empty());
    assert!(!tokens["refresh_token"].as_str().unwrap().is_empty());

    let claims = app
        .services
        .verify_access_token(tokens["access_token"].as_str().unwrap())
        .await
        .expect("issued token verifies");
    assert_eq!(claims.subject, SUBJECT);
    assert_eq!(claims.audience, CLIENT_ID);
    assert_eq!(claims.scope, SCOPE);

    let resp = app.post_form("/token", &fields).await;
    support::assert_oauth_error(
        resp,
        StatusCode::BAD_REQUEST,
        "invalid_grant",
        Some("Invalid authorization code"),
    )
    .await;
}

fn with_base<'a>(base: &[(&'a str, &'a str)], extra: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    base.iter().chain(extra).copied().collect()
}

#[tokio::test]
async fn authorize_rejects_bad_parameters_with_plain_text() {
    let app = TestApp::new();
    let base = [
        ("client_id", CLIENT_ID),
        ("redirect_uri", REDIRECT_URI),
        ("state", "s1"),
    ];

    let cases: Vec<(Vec<(&str, &str)>, &str)> = vec![
        (base.to_vec(), "missing response_type"),
        (with_base(&base, &[("response_type", "token")]), "unsupported response_type"),
        (
            vec![("response_type", "code"), ("redirect_uri", REDIRECT_URI), ("state", "s1")],
            "missing client_id",
        ),
        (
            vec![("response_type", "code"), ("client_id", CLIENT_ID), ("redirect_uri", REDIRECT_URI)],
            "missing state",
        ),
        (
            vec![
                ("response_type", "code"),
                ("client_id", "unknown-app"),
                ("redirect_uri", REDIRECT_URI),
                ("state", "s1"),
            ],
            "invalid client_id or redirect_uri",
        ),
        (
            // the allowed prefix must prefix the candidate, not the other way round
            vec![
                ("response_type", "code"),
                ("client_id", CLIENT_ID),
                ("redirect_uri", "https://voice.example.com/"),
                ("state", "s1"),
            ],
            "invalid client_id or redirect_uri",
        ),
        (
            with_base(
                &base,
                &[
                    ("response_type", "code"),
                    ("code_challenge", "abc"),
                    ("code_challenge_method", "S512"),
                ],
            ),
            "unsupported code_challenge_method",
        ),
    ];

    for (params, expected) in cases {
        let resp = app.authorize(&params).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "params: {params:?}");
        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(content_type.starts_with("text/plain"), "content-type: {content_type}");
        let text = body_text(resp).await;
        assert!(text.contains(expected), "expected {expected:?} in {text:?}");
    }

    assert!(app.store.is_empty());
}

#[tokio::test]
async fn per_installation_suffix_is_accepted() {
    let app = TestApp::new();
    let redirect = format!("{REDIRECT_URI}M2ABCDEF?vendor=1");

    let resp = app
        .authorize(&[
            ("response_type", "code"),
            ("client_id", CLIENT_ID),
            ("redirect_uri", redirect.as_str()),
            ("state", "suffix"),
        ])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.callback("suffix", &proof_for(SUBJECT)).await;
    let json = body_json(resp).await;
    let url = json["redirectUrl"].as_str().unwrap();
    assert!(url.starts_with(&format!("{redirect}&code=")), "{url}");
}

#[tokio::test]
async fn callback_requires_fields() {
    let app = TestApp::new();

    let resp = app
        .post_json("/authorize/callback", &serde_json::json!({ "state": "abc123" }))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "missing identityProof");

    let resp = app
        .post_json("/authorize/callback", &serde_json::json!({ "identityProof": "x" }))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "missing state");
}

#[tokio::test]
async fn callback_with_unknown_state_fails() {
    let app = TestApp::new();

    let resp = app.callback("never-issued", &proof_for(SUBJECT)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "Invalid or expired state");
}

#[tokio::test]
async fn state_is_consumed_by_first_callback() {
    let app = TestApp::new();
    app.obtain_code("once", None).await;

    let resp = app.callback("once", &proof_for(SUBJECT)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "Invalid or expired state");
}

#[tokio::test]
async fn expired_state_is_rejected_and_gone() {
    let app = TestApp::new();
    let resp = app
        .authorize(&[
            ("response_type", "code"),
            ("client_id", CLIENT_ID),
            ("redirect_uri", REDIRECT_URI),
            ("state", "slow"),
        ])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    app.clock.advance(Duration::minutes(11));

    let resp = app.callback("slow", &proof_for(SUBJECT)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "State expired");

    let resp = app.callback("slow", &proof_for(SUBJECT)).await;
    assert_eq!(body_json(resp).await["error"], "Invalid or expired state");
}

#[tokio::test]
async fn failed_identity_verification_is_a_server_error_and_burns_the_state() {
    let app = TestApp::new();
    let resp = app
        .authorize(&[
            ("response_type", "code"),
            ("client_id", CLIENT_ID),
            ("redirect_uri", REDIRECT_URI),
            ("state", "forged"),
        ])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.callback("forged", "not-a-proof").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["error"], "Identity verification failed");

    let resp = app.callback("forged", &proof_for(SUBJECT)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn colliding_state_overwrites_pending_record() {
    let app = TestApp::new();
    for redirect in [REDIRECT_URI, "https://voice.example.com/link/second"] {
        let resp = app
            .authorize(&[
                ("response_type", "code"),
                ("client_id", CLIENT_ID),
                ("redirect_uri", redirect),
                ("state", "dup"),
            ])
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = app.callback("dup", &proof_for(SUBJECT)).await;
    let json = body_json(resp).await;
    assert!(
        json["redirectUrl"]
            .as_str()
            .unwrap()
            .starts_with("https://voice.example.com/link/second?code=")
    );
}

#[tokio::test]
async fn random_source_failure_is_a_server_error() {
    let app = TestApp::with_options(support::TestOptions {
        random: std::sync::Arc::new(support::FailingRandomBytes),
        ..support::TestOptions::default()
    });
    let resp = app
        .authorize(&[
            ("response_type", "code"),
            ("client_id", CLIENT_ID),
            ("redirect_uri", REDIRECT_URI),
            ("state", "no-entropy"),
        ])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.callback("no-entropy", &proof_for(SUBJECT)).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["error"], "Internal server error");
}

#[tokio::test]
async fn callback_rechecks_the_stored_redirect_against_the_allowlist() {
    let app = TestApp::new();
    app.store
        .put_state(
            "drift",
            AuthorizationState {
                client_id: CLIENT_ID.into(),
                redirect_uri: "https://evil.example/".into(),
                code_challenge: None,
                code_challenge_method: None,
                expires_at: app.clock.now() + Duration::minutes(5),
            },
        )
        .await
        .unwrap();

    let resp = app.callback("drift", &proof_for(SUBJECT)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "invalid redirect_uri");
    assert!(app.store.is_empty());

    let resp = app.callback("drift", &proof_for(SUBJECT)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "Invalid or expired state");
}

#[tokio::test]
async fn unrepresentable_lifetime_is_a_server_error_not_a_panic() {
    let app = TestApp::with_options(TestOptions {
        policy: LinkPolicy {
            authorization_ttl: Duration::seconds(1_000_000_000_000_000),
            ..LinkPolicy::default()
        },
        ..TestOptions::default()
    });

    let resp = app
        .authorize(&[
            ("response_type", "code"),
            ("client_id", CLIENT_ID),
            ("redirect_uri", REDIRECT_URI),
            ("state", "far-future"),
        ])
        .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(resp).await, "Internal server error");
    assert!(app.store.is_empty());
}
