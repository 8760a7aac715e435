pub mod authorization;
pub mod token;
