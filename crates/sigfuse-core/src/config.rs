//! Aggregator configuration.
//!
//! The configuration is built once at startup and handed to
//! [`SignalAggregator`](crate::SignalAggregator); nothing in the crate reads
//! global state afterwards.
//!
//! # Environment Variables
//!
//! For every catalog provider the key is read from `SIGFUSE_<ID>_API_KEY`
//! first and then from the provider's own variable (for example
//! `COINGECKO_API_KEY`). Empty values count as absent.
//!
//! # JSON overlay
//!
//! ```json
//! {
//!   "request_timeout_ms": 2500,
//!   "cache_hint_secs": 30,
//!   "providers": [{ "id": "mirror", "name": "Mirror", "base_url": "https://mirror.test" }],
//!   "rotation": { "price": ["mirror", "coingecko"] },
//!   "api_keys": { "mirror": "secret" }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::credentials::Credentials;
use crate::provider::{ProviderCatalog, ProviderDescriptor, ProviderId};
use crate::{Category, ConfigError, ValidationError};

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_CACHE_HINT_SECS: u64 = 60;

/// Ordered provider fallback list per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationTable {
    rotations: BTreeMap<Category, Vec<ProviderId>>,
}

impl Default for RotationTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (category, ids) in [
            (Category::Price, &["coingecko", "coinmarketcap", "coinlayer"][..]),
            (Category::Exchange, &["binance", "okx", "coinbase", "kraken"][..]),
            (Category::Onchain, &["glassnode", "debank", "flipside"][..]),
            (Category::Social, &["lunarcrush", "cryptometer"][..]),
            (Category::Technical, &["cryptocompare", "taapi"][..]),
        ] {
            let providers = ids
                .iter()
                .filter_map(|id| ProviderId::parse(id).ok())
                .collect();
            table.set(category, providers);
        }
        table
    }
}

impl RotationTable {
    /// A table with no providers for any category.
    pub fn empty() -> Self {
        Self {
            rotations: Category::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
        }
    }

    /// Replace the rotation for `category`. Duplicate ids keep their first position.
    pub fn set(&mut self, category: Category, providers: Vec<ProviderId>) {
        let mut deduped: Vec<ProviderId> = Vec::with_capacity(providers.len());
        for provider in providers {
            if !deduped.contains(&provider) {
                deduped.push(provider);
            }
        }
        self.rotations.insert(category, deduped);
    }

    pub fn providers(&self, category: Category) -> &[ProviderId] {
        self.rotations
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[ProviderId])> {
        self.rotations
            .iter()
            .map(|(category, providers)| (*category, providers.as_slice()))
    }
}

/// Everything the aggregator needs to reach its providers.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    catalog: ProviderCatalog,
    rotation: RotationTable,
    credentials: Credentials,
    request_timeout_ms: u64,
    cache_hint_secs: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            catalog: ProviderCatalog::builtin(),
            rotation: RotationTable::default(),
            credentials: Credentials::new(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            cache_hint_secs: DEFAULT_CACHE_HINT_SECS,
        }
    }
}

impl AggregatorConfig {
    pub fn builder() -> AggregatorConfigBuilder {
        AggregatorConfigBuilder::new()
    }

    /// Built-in providers, keys from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder().with_keys_from_env().build()
    }

    /// Built-in providers overlaid with a JSON document, then keys from the environment.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Self::builder()
            .with_json_overlay(raw)?
            .with_keys_from_env()
            .build()
    }

    /// Same as [`AggregatorConfig::from_json_str`], reading the overlay from `path`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::builder()
            .with_json_file(path)?
            .with_keys_from_env()
            .build()
    }

    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    pub fn rotation(&self) -> &RotationTable {
        &self.rotation
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn request_timeout_ms(&self) -> u64 {
        self.request_timeout_ms
    }

    pub fn cache_hint_secs(&self) -> u64 {
        self.cache_hint_secs
    }

    /// Rotation entries that have no descriptor in the catalog. They are skipped at fetch time.
    pub fn dangling_providers(&self) -> Vec<(Category, ProviderId)> {
        let mut dangling = Vec::new();
        for (category, providers) in self.rotation.iter() {
            for id in providers {
                if !self.catalog.contains(id) {
                    dangling.push((category, id.clone()));
                }
            }
        }
        dangling
    }
}

/// Builder for [`AggregatorConfig`].
#[derive(Debug, Default)]
pub struct AggregatorConfigBuilder {
    config: AggregatorConfig,
    load_env: bool,
}

impl AggregatorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole catalog.
    pub fn with_catalog(mut self, catalog: ProviderCatalog) -> Self {
        self.config.catalog = catalog;
        self
    }

    /// Add or override a single provider descriptor.
    pub fn with_provider(mut self, descriptor: ProviderDescriptor) -> Self {
        self.config.catalog.insert(descriptor);
        self
    }

    pub fn with_rotation(mut self, category: Category, providers: Vec<ProviderId>) -> Self {
        self.config.rotation.set(category, providers);
        self
    }

    pub fn with_rotation_table(mut self, rotation: RotationTable) -> Self {
        self.config.rotation = rotation;
        self
    }

    pub fn with_api_key(mut self, provider: ProviderId, key: impl Into<String>) -> Self {
        self.config.credentials.insert(provider, key);
        self
    }

    /// Fill missing keys from the environment when [`build`](Self::build) runs.
    pub fn with_keys_from_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.request_timeout_ms = timeout_ms;
        self
    }

    pub fn with_cache_hint_secs(mut self, cache_hint_secs: u64) -> Self {
        self.config.cache_hint_secs = cache_hint_secs;
        self
    }

    /// Apply a JSON overlay (see module docs).
    pub fn with_json_overlay(mut self, raw: &str) -> Result<Self, ConfigError> {
        let overlay: ConfigOverlay = serde_json::from_str(raw)?;

        for descriptor in overlay.providers {
            descriptor.validate()?;
            self.config.catalog.insert(descriptor);
        }

        for (category, providers) in overlay.rotation {
            let category = category.parse::<Category>()?;
            let providers = providers
                .iter()
                .map(|id| ProviderId::parse(id))
                .collect::<Result<Vec<_>, ValidationError>>()?;
            self.config.rotation.set(category, providers);
        }

        for (provider, key) in overlay.api_keys {
            self.config
                .credentials
                .insert(ProviderId::parse(&provider)?, key);
        }

        if let Some(timeout_ms) = overlay.request_timeout_ms {
            self.config.request_timeout_ms = timeout_ms;
        }
        if let Some(cache_hint_secs) = overlay.cache_hint_secs {
            self.config.cache_hint_secs = cache_hint_secs;
        }

        Ok(self)
    }

    pub fn with_json_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.with_json_overlay(&raw)
    }

    pub fn build(mut self) -> Result<AggregatorConfig, ConfigError> {
        if self.config.request_timeout_ms == 0 {
            return Err(ValidationError::NonPositiveValue {
                field: "request_timeout_ms",
            }
            .into());
        }

        if self.load_env {
            let catalog = self.config.catalog.clone();
            self.config.credentials.load_env(&catalog);
        }

        Ok(self.config)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverlay {
    #[serde(default)]
    providers: Vec<ProviderDescriptor>,
    #[serde(default)]
    rotation: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    api_keys: BTreeMap<String, String>,
    request_timeout_ms: Option<u64>,
    cache_hint_secs: Option<u64>,
}
