// src/presentation/http/controllers/mod.rs
pub mod authorize;
pub mod discovery;
pub mod token;
pub mod userinfo;
