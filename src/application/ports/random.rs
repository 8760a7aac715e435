// src/application/ports/random.rs
use crate::application::ApplicationResult;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

/// Source of secret random bytes. Implementations must be backed by a CSPRNG.
pub trait RandomBytes: Send + Sync {
    fn random_bytes(&self, len: usize) -> ApplicationResult<Vec<u8>>;
}

/// Bytes of entropy behind every code and refresh token.
pub const OPAQUE_TOKEN_BYTES: usize = 32;

/// URL-safe opaque token carrying `OPAQUE_TOKEN_BYTES` of entropy.
pub fn opaque_token(source: &dyn RandomBytes) -> ApplicationResult<String> {
    let bytes = source.random_bytes(OPAQUE_TOKEN_BYTES)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
