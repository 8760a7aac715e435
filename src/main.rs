use pantry_link::application::{
    ports::{
        authorization_code::AuthorizationCodeStore, authorization_state::AuthorizationStateStore,
        random::RandomBytes, refresh_token::RefreshTokenStore, time::Clock,
    },
    services::{ApplicationPorts, ApplicationServices, LinkPolicy},
};
use pantry_link::config::{AppConfig, Environment};
use pantry_link::infrastructure::{
    random::OsRandomBytes,
    security::{
        identity::HmacIdentityVerifier,
        token::{AccessTokenSettings, BiscuitAccessTokenCodec},
    },
    store::{InMemoryLinkStore, RedisLinkStore},
    sweeper::spawn_expiry_sweeper,
    time::SystemClock,
};
use pantry_link::presentation::http::{routes::build_router_with, state::HttpState};
use anyhow::{Context, Result};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

struct LinkStores {
    states: Arc<dyn AuthorizationStateStore>,
    codes: Arc<dyn AuthorizationCodeStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
}

fn build_stores(config: &AppConfig, clock: &Arc<dyn Clock>) -> Result<LinkStores> {
    if let Some(url) = config.redis_url() {
        let store = Arc::new(
            RedisLinkStore::from_url(url, Arc::clone(clock)).context("creating redis pool")?,
        );
        tracing::info!("using redis link store");
        return Ok(LinkStores {
            states: store.clone(),
            codes: store.clone(),
            refresh_tokens: store,
        });
    }

    if config.environment() == Environment::Production {
        tracing::warn!("REDIS_URL not set; link records will not survive a restart");
    }
    let store = Arc::new(InMemoryLinkStore::new());
    Ok(LinkStores {
        states: store.clone(),
        codes: store.clone(),
        refresh_tokens: store,
    })
}

/// Configured secret, or a random one that lives only as long as the process.
fn secret_or_ephemeral(
    configured: Option<&str>,
    name: &str,
    random: &dyn RandomBytes,
) -> Result<String> {
    if let Some(value) = configured {
        return Ok(value.to_owned());
    }

    tracing::warn!(
        variable = name,
        "not configured; generated an ephemeral development value"
    );
    let bytes = random
        .random_bytes(32)
        .with_context(|| format!("generating {name}"))?;
    Ok(hex::encode(bytes))
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let random: Arc<dyn RandomBytes> = Arc::new(OsRandomBytes);

    let private_key = secret_or_ephemeral(
        config.access_token_private_key(),
        "ACCESS_TOKEN_PRIVATE_KEY",
        random.as_ref(),
    )?;
    let identity_secret = secret_or_ephemeral(
        config.identity_proof_secret(),
        "IDENTITY_PROOF_SECRET",
        random.as_ref(),
    )?;

    let token_codec = BiscuitAccessTokenCodec::new(
        &private_key,
        AccessTokenSettings {
            issuer: config.token_issuer().to_owned(),
            scope: config.token_scope().to_owned(),
            ttl: chrono::Duration::from_std(config.access_token_ttl())?,
        },
        Arc::clone(&clock),
    )?;
    let identity_verifier = HmacIdentityVerifier::new(identity_secret, Arc::clone(&clock))?;

    let stores = build_stores(&config, &clock)?;

    let services = Arc::new(ApplicationServices::new(
        config.redirect_allowlist().clone(),
        ApplicationPorts {
            state_store: stores.states,
            code_store: stores.codes,
            refresh_store: stores.refresh_tokens,
            token_codec: Arc::new(token_codec),
            identity_verifier: Arc::new(identity_verifier),
            clock: Arc::clone(&clock),
            random,
        },
        LinkPolicy {
            authorization_ttl: chrono::Duration::from_std(config.authorization_ttl())?,
            refresh_token_ttl: chrono::Duration::from_std(config.refresh_token_ttl())?,
        },
    ));

    let sweeper = spawn_expiry_sweeper(Arc::clone(&services), config.sweep_interval());

    let state = HttpState::new(
        Arc::clone(&services),
        config.public_base_url(),
        config.token_scope(),
    );
    let app = build_router_with(
        state,
        Some(config.rate_limit()),
        config.allowed_origins(),
    );
    let service = app.into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    let served = axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    sweeper.abort();
    served?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
