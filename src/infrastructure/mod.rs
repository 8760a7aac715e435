pub mod random;
pub mod security;
pub mod store;
pub mod sweeper;
pub mod time;
