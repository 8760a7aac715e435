// tests/support/mocks/mod.rs
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod random;
pub mod security;
pub mod time;

pub use random::{CountingRandomBytes, FailingRandomBytes};
pub use security::{FailingTokenCodec, FakeIdentityVerifier, TEST_PRIVATE_KEY, proof_for};
pub use time::{ManualClock, fixed_now};
