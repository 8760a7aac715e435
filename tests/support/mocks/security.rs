// tests/support/mocks/security.rs
use async_trait::async_trait;
use pantry_link::application::{
    ApplicationResult,
    dto::{AccessTokenClaims, SignedAccessToken},
    error::ApplicationError,
    ports::security::{AccessTokenCodec, IdentityVerifier},
};

pub const TEST_PRIVATE_KEY: &str =
    "4d1c5c1e7b9bd6f0a3c2e1f00112233445566778899aabbccddeeff001122334";

const PROOF_PREFIX: &str = "proof-for:";

/// Identity proof the fake verifier accepts for `subject`.
pub fn proof_for(subject: &str) -> String {
    format!("{PROOF_PREFIX}{subject}")
}

/// Accepts proofs built by [`proof_for`].
#[derive(Debug, Default)]
pub struct FakeIdentityVerifier;

#[async_trait]
impl IdentityVerifier for FakeIdentityVerifier {
    async fn verify_identity(&self, proof: &str) -> ApplicationResult<String> {
        proof
            .strip_prefix(PROOF_PREFIX)
            .filter(|subject| !subject.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| ApplicationError::identity("unrecognised proof"))
    }
}

/// Codec whose signing key is unreachable.
#[derive(Debug, Default)]
pub struct FailingTokenCodec;

pub const FAILING_CODEC_DETAIL: &str = "hsm at 10.1.2.3 unreachable";

#[async_trait]
impl AccessTokenCodec for FailingTokenCodec {
    async fn sign(&self, _subject: &str, _audience: &str) -> ApplicationResult<SignedAccessToken> {
        Err(ApplicationError::infrastructure(FAILING_CODEC_DETAIL))
    }

    async fn verify(&self, _token: &str) -> ApplicationResult<AccessTokenClaims> {
        Err(ApplicationError::invalid_token("no key"))
    }
}
