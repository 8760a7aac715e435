//! PKCE (RFC 7636) challenge verification.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use std::str::FromStr;
use subtle::ConstantTimeEq;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PkceMethod {
    S256,
    Plain,
}

impl PkceMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::S256 => "S256",
            Self::Plain => "plain",
        }
    }
}

impl FromStr for PkceMethod {
    type Err = DomainError;

    // Method names are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S256" => Ok(Self::S256),
            "plain" => Ok(Self::Plain),
            other => Err(DomainError::Validation(format!(
                "unsupported code_challenge_method: {other}"
            ))),
        }
    }
}

/// base64url(SHA-256(verifier)) without padding.
pub fn s256_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Check a code verifier against the stored challenge.
///
/// `method` is the raw stored value; anything other than `S256` or `plain`
/// fails verification.
pub fn verify_pkce(method: &str, verifier: &str, challenge: &str) -> bool {
    let expected = match method.parse::<PkceMethod>() {
        Ok(PkceMethod::S256) => s256_challenge(verifier),
        Ok(PkceMethod::Plain) => verifier.to_owned(),
        Err(_) => return false,
    };

    expected.as_bytes().ct_eq(challenge.as_bytes()).into()
}
