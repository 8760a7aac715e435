pub mod entity;

pub use entity::{AuthorizationCode, AuthorizationState, Expiring, RefreshTokenRecord};
