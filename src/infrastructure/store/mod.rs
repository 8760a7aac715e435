pub mod memory;
pub mod redis_store;

pub use memory::InMemoryLinkStore;
pub use redis_store::RedisLinkStore;

/// Namespaces shared by every backend.
pub const AUTHORIZATION_STATES: &str = "authorization_states";
pub const AUTHORIZATION_CODES: &str = "authorization_codes";
pub const REFRESH_TOKENS: &str = "refresh_tokens";
