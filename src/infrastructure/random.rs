use crate::application::{ApplicationResult, error::ApplicationError, ports::random::RandomBytes};
use rand::{RngCore, rngs::OsRng};

/// Operating-system CSPRNG.
#[derive(Default, Clone)]
pub struct OsRandomBytes;

impl RandomBytes for OsRandomBytes {
    fn random_bytes(&self, len: usize) -> ApplicationResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        OsRng.try_fill_bytes(&mut buf).map_err(|err| {
            tracing::error!(error = %err, "OS random source failed");
            ApplicationError::infrastructure("random source unavailable")
        })?;
        Ok(buf)
    }
}
