//! API key lookup and auth header construction.
//!
//! Both lookups are pure: they read the key table handed in at startup and
//! never touch the network or the environment.

use std::collections::BTreeMap;
use std::env;

use crate::http_client::HttpAuth;
use crate::provider::{AuthScheme, ProviderCatalog, ProviderDescriptor, ProviderId};

/// Per-provider API keys. A provider without an entry is simply unauthenticated.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    keys: BTreeMap<ProviderId, String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("providers", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key. Blank keys are ignored.
    pub fn insert(&mut self, provider: ProviderId, key: impl Into<String>) {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return;
        }
        self.keys.insert(provider, trimmed.to_owned());
    }

    pub fn with_key(mut self, provider: ProviderId, key: impl Into<String>) -> Self {
        self.insert(provider, key);
        self
    }

    /// Read keys for every catalog entry from `SIGFUSE_<ID>_API_KEY`, then the
    /// descriptor's own `api_key_env`. Keys already present are kept.
    pub fn load_env(&mut self, catalog: &ProviderCatalog) {
        self.load_with(catalog, |name| env::var(name).ok());
    }

    fn load_with<F>(&mut self, catalog: &ProviderCatalog, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for descriptor in catalog.iter() {
            if self.keys.contains_key(&descriptor.id) {
                continue;
            }

            let key = lookup(&descriptor.id.prefixed_env_var())
                .filter(|value| !value.trim().is_empty())
                .or_else(|| {
                    descriptor
                        .api_key_env
                        .as_deref()
                        .and_then(|name| lookup(name))
                        .filter(|value| !value.trim().is_empty())
                });

            if let Some(key) = key {
                self.insert(descriptor.id.clone(), key);
            }
        }
    }

    pub fn api_key_for(&self, provider: &ProviderId) -> Option<&str> {
        self.keys.get(provider).map(String::as_str)
    }

    pub fn has_key(&self, provider: &ProviderId) -> bool {
        self.keys.contains_key(provider)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Auth strategy for `descriptor` given the configured key.
    pub fn auth_for(&self, descriptor: &ProviderDescriptor) -> HttpAuth {
        let Some(key) = self.api_key_for(&descriptor.id) else {
            return HttpAuth::None;
        };

        match &descriptor.auth {
            AuthScheme::Bearer => HttpAuth::BearerToken(key.to_owned()),
            AuthScheme::Header { name } => HttpAuth::Header {
                name: name.clone(),
                value: key.to_owned(),
            },
            AuthScheme::SignedRequest => HttpAuth::None,
        }
    }

    /// Full header map sent to `descriptor`: JSON content type plus auth.
    pub fn auth_headers_for(&self, descriptor: &ProviderDescriptor) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert(
            String::from("content-type"),
            String::from("application/json"),
        );
        self.auth_for(descriptor).apply(&mut headers);
        headers
    }
}
