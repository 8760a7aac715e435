pub mod errors;
pub mod link;
pub mod pkce;
pub mod redirect;

pub use link::{AuthorizationCode, AuthorizationState, RefreshTokenRecord};
pub use pkce::{PkceMethod, verify_pkce};
pub use redirect::RedirectAllowlist;
