// src/presentation/http/state.rs
use crate::application::services::ApplicationServices;
use std::sync::Arc;

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    /// Externally visible origin, without trailing slash.
    pub public_base_url: Arc<str>,
    pub scope: Arc<str>,
}

impl HttpState {
    pub fn new(
        services: Arc<ApplicationServices>,
        public_base_url: &str,
        scope: &str,
    ) -> Self {
        Self {
            services,
            public_base_url: Arc::from(public_base_url.trim_end_matches('/')),
            scope: Arc::from(scope),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.public_base_url)
    }
}
