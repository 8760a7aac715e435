// src/application/ports/mod.rs
pub mod authorization_code;
pub mod authorization_state;
pub mod random;
pub mod refresh_token;
pub mod security;
pub mod time;

// Trait-object names used at injection sites.
pub type AuthorizationStateStorePort = dyn authorization_state::AuthorizationStateStore;
pub type AuthorizationCodeStorePort = dyn authorization_code::AuthorizationCodeStore;
pub type RefreshTokenStorePort = dyn refresh_token::RefreshTokenStore;
pub type AccessTokenCodecPort = dyn security::AccessTokenCodec;
pub type IdentityVerifierPort = dyn security::IdentityVerifier;
pub type ClockPort = dyn time::Clock;
pub type RandomBytesPort = dyn random::RandomBytes;
