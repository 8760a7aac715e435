// src/domain/link/entity.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Records that carry an absolute expiry. Every read path re-checks it, so a
/// record that outlived its sweep is still rejected.
pub trait Expiring {
    fn expires_at(&self) -> DateTime<Utc>;

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at()
    }
}

/// Pending authorization attempt, keyed by the caller-supplied `state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationState {
    pub client_id: String,
    pub redirect_uri: String,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// One-time authorization code, keyed by the opaque code value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationCode {
    pub subject: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// Stored half of a refresh token. Keyed by the token hash; the raw value
/// only exists on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub subject: String,
    pub client_id: String,
    pub expires_at: DateTime<Utc>,
}

impl Expiring for AuthorizationState {
    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl Expiring for AuthorizationCode {
    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl Expiring for RefreshTokenRecord {
    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}
