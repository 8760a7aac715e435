mod authorization_code;
mod exchange;
mod issue;
mod refresh;
mod service;

pub use authorization_code::AuthorizationCodeGrant;
pub use exchange::{GrantType, TokenRequestCommand};
pub use refresh::{RefreshTokenGrant, hash_refresh_token};
pub use service::{DEFAULT_REFRESH_TOKEN_TTL_SECS, TokenCommandService};
