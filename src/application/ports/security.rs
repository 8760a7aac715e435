// src/application/ports/security.rs
use crate::application::{
    ApplicationResult,
    dto::{AccessTokenClaims, SignedAccessToken},
};
use async_trait::async_trait;

#[async_trait]
pub trait AccessTokenCodec: Send + Sync {
    /// Sign a short-lived access token for `subject` addressed to `audience`.
    async fn sign(&self, subject: &str, audience: &str) -> ApplicationResult<SignedAccessToken>;

    /// Check signature and expiry. Fails with `InvalidToken` or `TokenExpired`.
    async fn verify(&self, token: &str) -> ApplicationResult<AccessTokenClaims>;
}

/// Turns an end-user credential proof into a stable subject identifier.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify_identity(&self, proof: &str) -> ApplicationResult<String>;
}
