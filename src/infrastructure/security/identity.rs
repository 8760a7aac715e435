// src/infrastructure/security/identity.rs
//! Identity proofs minted by the companion app's sign-in backend.
//!
//! A proof is `base64url(payload) "." base64url(HMAC-SHA256(secret, base64url(payload)))`
//! where the payload is JSON `{"sub": "<user id>", "exp": <unix seconds>}`.

use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::{security::IdentityVerifier, time::Clock},
};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

/// Shortest accepted secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct ProofPayload {
    sub: String,
    exp: i64,
}

pub struct HmacIdentityVerifier {
    secret: Vec<u8>,
    clock: Arc<dyn Clock>,
}

impl HmacIdentityVerifier {
    pub fn new(secret: impl Into<Vec<u8>>, clock: Arc<dyn Clock>) -> ApplicationResult<Self> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(ApplicationError::infrastructure(format!(
                "identity proof secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        Ok(Self { secret, clock })
    }

    fn mac(&self) -> ApplicationResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))
    }

    /// Mint a proof for `subject`. Used by the sign-in side and by tests.
    pub fn sign_proof(&self, subject: &str, expires_at: DateTime<Utc>) -> ApplicationResult<String> {
        let payload = serde_json::to_vec(&ProofPayload {
            sub: subject.to_owned(),
            exp: expires_at.timestamp(),
        })
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let encoded = URL_SAFE_NO_PAD.encode(payload);

        let mut mac = self.mac()?;
        mac.update(encoded.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{encoded}.{signature}"))
    }
}

#[async_trait]
impl IdentityVerifier for HmacIdentityVerifier {
    async fn verify_identity(&self, proof: &str) -> ApplicationResult<String> {
        let (encoded, signature) = proof
            .split_once('.')
            .ok_or_else(|| ApplicationError::identity("malformed proof"))?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| ApplicationError::identity("malformed proof signature"))?;

        let mut mac = self.mac()?;
        mac.update(encoded.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| ApplicationError::identity("bad proof signature"))?;

        let payload: ProofPayload = URL_SAFE_NO_PAD
            .decode(encoded)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or_else(|| ApplicationError::identity("malformed proof payload"))?;

        if self.clock.now().timestamp() > payload.exp {
            return Err(ApplicationError::identity("proof expired"));
        }
        if payload.sub.is_empty() {
            return Err(ApplicationError::identity("proof has no subject"));
        }

        Ok(payload.sub)
    }
}
