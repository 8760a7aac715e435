// src/config.rs
use crate::domain::RedirectAllowlist;
use std::{env, time::Duration};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    pub enabled: bool,
    /// Interval after which one request of the burst quota is restored.
    pub replenish_interval_ms: u64,
    pub burst: u32,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    environment: Environment,
    listen_addr: String,
    public_base_url: String,
    access_token_private_key: Option<String>,
    identity_proof_secret: Option<String>,
    token_issuer: String,
    token_scope: String,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
    authorization_ttl: Duration,
    redirect_allowlist: RedirectAllowlist,
    redis_url: Option<String>,
    sweep_interval: Duration,
    rate_limit: RateLimitSettings,
    allowed_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

const DEFAULT_REDIRECT_ALLOWLIST: &str = "voice-app=\
    https://pitangui.amazon.com/api/skill/link/|\
    https://layla.amazon.com/api/skill/link/|\
    https://alexa.amazon.co.jp/api/skill/link/";

const DEFAULT_ACCESS_TOKEN_TTL_SECS: u64 = 3600;
const DEFAULT_REFRESH_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 30;
const DEFAULT_AUTHORIZATION_TTL_SECS: u64 = 600;
/// Upper bound for every configured lifetime (ten years).
const MAX_TTL_SECS: u64 = 60 * 60 * 24 * 365 * 10;

impl AppConfig {
    /// Build configuration from environment variables. Uses sensible defaults
    /// for optional values and validates required keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading from an arbitrary source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match var("APP_ENV").as_deref() {
            None | Some("development" | "dev" | "test") => Environment::Development,
            Some("production" | "prod") => Environment::Production,
            Some(other) => return Err(ConfigError::Invalid(format!("unknown APP_ENV {other}"))),
        };

        let listen_addr = var("LISTEN_ADDR").unwrap_or_else(default_listen_addr);
        let public_base_url = var("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://{listen_addr}"))
            .trim_end_matches('/')
            .to_string();

        let access_token_private_key = var("ACCESS_TOKEN_PRIVATE_KEY");
        if let Some(key) = access_token_private_key.as_deref() {
            if key.len() != 64 || !key.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::Invalid(
                    "ACCESS_TOKEN_PRIVATE_KEY must be a 32-byte hex string".into(),
                ));
            }
        }

        let identity_proof_secret = var("IDENTITY_PROOF_SECRET");
        if identity_proof_secret.as_deref().is_some_and(|s| s.len() < 32) {
            return Err(ConfigError::Invalid(
                "IDENTITY_PROOF_SECRET must be at least 32 bytes".into(),
            ));
        }

        if environment == Environment::Production {
            if access_token_private_key.is_none() {
                return Err(ConfigError::Missing("ACCESS_TOKEN_PRIVATE_KEY"));
            }
            if identity_proof_secret.is_none() {
                return Err(ConfigError::Missing("IDENTITY_PROOF_SECRET"));
            }
        }

        let redirect_allowlist = RedirectAllowlist::parse(
            var("OAUTH_REDIRECT_ALLOWLIST")
                .as_deref()
                .unwrap_or(DEFAULT_REDIRECT_ALLOWLIST),
        )
        .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if redirect_allowlist.is_empty() {
            return Err(ConfigError::Invalid("OAUTH_REDIRECT_ALLOWLIST is empty".into()));
        }

        let positive = |key: &'static str, default: u64| -> Result<u64, ConfigError> {
            match var(key) {
                None => Ok(default),
                Some(raw) => raw
                    .parse::<u64>()
                    .ok()
                    .filter(|v| *v > 0)
                    .ok_or_else(|| ConfigError::Invalid(format!("{key} must be a positive integer"))),
            }
        };
        let secs = |key: &'static str, default: u64| {
            positive(key, default).and_then(|v| {
                if v > MAX_TTL_SECS {
                    return Err(ConfigError::Invalid(format!(
                        "{key} must not exceed {MAX_TTL_SECS} seconds"
                    )));
                }
                Ok(Duration::from_secs(v))
            })
        };

        let access_token_ttl = secs("ACCESS_TOKEN_TTL_SECONDS", DEFAULT_ACCESS_TOKEN_TTL_SECS)?;
        let refresh_token_ttl = secs("REFRESH_TOKEN_TTL_SECONDS", DEFAULT_REFRESH_TOKEN_TTL_SECS)?;
        let authorization_ttl = secs("AUTHORIZATION_TTL_SECONDS", DEFAULT_AUTHORIZATION_TTL_SECS)?;
        let sweep_interval = secs("SWEEP_INTERVAL_SECONDS", 60)?;

        let rate_limit = RateLimitSettings {
            enabled: var("RATE_LIMIT_ENABLED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(true),
            replenish_interval_ms: positive("RATE_LIMIT_REPLENISH_MS", 100)?,
            burst: u32::try_from(positive("RATE_LIMIT_BURST", 20)?)
                .map_err(|_| ConfigError::Invalid("RATE_LIMIT_BURST is too large".into()))?,
        };

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|s| s.split(',').map(|p| p.trim().to_string()).collect())
            .unwrap_or_default();

        Ok(Self {
            environment,
            listen_addr,
            public_base_url,
            access_token_private_key,
            identity_proof_secret,
            token_issuer: var("TOKEN_ISSUER").unwrap_or_else(|| "pantry-link".into()),
            token_scope: var("TOKEN_SCOPE").unwrap_or_else(|| "pantry:voice".into()),
            access_token_ttl,
            refresh_token_ttl,
            authorization_ttl,
            redirect_allowlist,
            redis_url: var("REDIS_URL"),
            sweep_interval,
            rate_limit,
            allowed_origins,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// Hex Ed25519 key. `None` only outside production.
    pub fn access_token_private_key(&self) -> Option<&str> {
        self.access_token_private_key.as_deref()
    }

    /// `None` only outside production.
    pub fn identity_proof_secret(&self) -> Option<&str> {
        self.identity_proof_secret.as_deref()
    }

    pub fn token_issuer(&self) -> &str {
        &self.token_issuer
    }

    pub fn token_scope(&self) -> &str {
        &self.token_scope
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }

    pub fn authorization_ttl(&self) -> Duration {
        self.authorization_ttl
    }

    pub fn redirect_allowlist(&self) -> &RedirectAllowlist {
        &self.redirect_allowlist
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    pub fn rate_limit(&self) -> RateLimitSettings {
        self.rate_limit
    }

    /// Empty means any origin.
    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }
}
