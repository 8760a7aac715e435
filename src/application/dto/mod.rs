pub mod auth;

pub use auth::{AccessTokenClaims, SignedAccessToken, TokenResponseDto};
