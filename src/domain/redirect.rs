// src/domain/redirect.rs
use super::errors::{DomainError, DomainResult};
use std::collections::HashMap;

/// Static table of client ids and the redirect-URI prefixes they may use.
///
/// The voice platform appends an opaque per-installation suffix to its
/// redirect URI, so a candidate is accepted when one of the registered
/// prefixes is a prefix of it. There is no wildcard or pattern matching.
#[derive(Debug, Clone, Default)]
pub struct RedirectAllowlist {
    clients: HashMap<String, Vec<String>>,
}

impl RedirectAllowlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client with its allowed prefixes. Empty prefixes are rejected
    /// since they would match every redirect URI.
    pub fn with_client<I, S>(mut self, client_id: impl Into<String>, prefixes: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(DomainError::Validation("client id must not be empty".into()));
        }

        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        if prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(DomainError::Validation(format!(
                "client {client_id} has an empty redirect prefix"
            )));
        }

        self.clients.entry(client_id).or_default().extend(prefixes);
        Ok(self)
    }

    /// Parse `client=prefix|prefix;other=prefix`.
    pub fn parse(spec: &str) -> DomainResult<Self> {
        let mut allowlist = Self::new();
        for entry in spec.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (client_id, prefixes) = entry.split_once('=').ok_or_else(|| {
                DomainError::Validation(format!("malformed allowlist entry: {entry}"))
            })?;
            allowlist = allowlist.with_client(
                client_id.trim(),
                prefixes.split('|').map(str::trim),
            )?;
        }
        Ok(allowlist)
    }

    pub fn is_valid_redirect(&self, client_id: &str, redirect_uri: &str) -> bool {
        self.clients.get(client_id).is_some_and(|prefixes| {
            prefixes
                .iter()
                .any(|prefix| redirect_uri.starts_with(prefix.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
