// tests/support/mocks/random.rs
use pantry_link::application::{
    ApplicationResult, error::ApplicationError, ports::random::RandomBytes,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// Deterministic source: every call yields a different, predictable buffer.
#[derive(Debug, Default)]
pub struct CountingRandomBytes {
    calls: AtomicU64,
}

impl RandomBytes for CountingRandomBytes {
    fn random_bytes(&self, len: usize) -> ApplicationResult<Vec<u8>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst).to_be_bytes();
        Ok((0..len).map(|i| call[i % call.len()] ^ (i as u8)).collect())
    }
}

#[derive(Debug, Default)]
pub struct FailingRandomBytes;

impl RandomBytes for FailingRandomBytes {
    fn random_bytes(&self, _len: usize) -> ApplicationResult<Vec<u8>> {
        Err(ApplicationError::infrastructure("entropy pool exhausted"))
    }
}
