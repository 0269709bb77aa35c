//! # Sigfuse Core
//!
//! Multi-source crypto signal aggregation.
//!
//! ## Overview
//!
//! For a coin and trading pair the aggregator queries five data categories
//! (price, exchange, social, on-chain, technical), each served by an ordered
//! rotation of third-party providers. Every answering category is scored in
//! `[0, 100]` and the scores are combined by fixed weights into one
//! five-level recommendation that stays valid for five minutes.
//!
//! - **Provider rotation** with first-success short-circuit per category
//! - **Per-provider auth** (bearer, named header, `apikey` query parameter)
//! - **Pure scorers** that degrade to neutral on malformed payloads
//! - **Weighted combiner** that renormalizes over categories that answered
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`aggregator`] | Signal combiner and batch aggregation |
//! | [`cache`] | In-memory cache of live signals |
//! | [`category`] | Data categories, weights and request shapes |
//! | [`config`] | Injected configuration and rotation table |
//! | [`credentials`] | API keys and auth headers |
//! | [`domain`] | Coin/pair symbols and UTC timestamps |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`provider`] | Provider identifiers and catalog |
//! | [`rotation`] | Ordered provider fallback |
//! | [`scoring`] | Category scorers |
//! | [`signal`] | Signal value types |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sigfuse_core::{AggregatorConfig, Coin, SignalAggregator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(AggregatorConfig::from_env()?);
//!     let aggregator = SignalAggregator::new(config);
//!
//!     let coin = Coin::parse("BTC")?;
//!     let signal = aggregator
//!         .generate_aggregated_signal(&coin, &coin.default_pair())
//!         .await;
//!
//!     println!("{} {:.2}", signal.signal.as_str(), signal.confidence);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Caller   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ SignalAggregator│────▶│ Scorers (pure)   │
//! └────────┬────────┘     └──────────────────┘
//!          │ 5 categories, joined
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ RotationFetcher │────▶│ HTTP Client      │
//! │ (per category)  │     │ (reqwest/noop)   │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Security
//!
//! - API keys come from the environment or config file and are never logged
//! - Logged request URLs carry a redacted `apikey`
//! - Coin and pair symbols are validated before any request is built

pub mod aggregator;
pub mod cache;
pub mod category;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod provider;
pub mod rotation;
pub mod scoring;
pub mod signal;

pub use aggregator::{BatchEntry, BatchReport, RejectedEntry, SignalAggregator};
pub use cache::SignalCache;
pub use category::{Category, CategoryRequest};
pub use config::{
    AggregatorConfig, AggregatorConfigBuilder, RotationTable, DEFAULT_CACHE_HINT_SECS,
    DEFAULT_REQUEST_TIMEOUT_MS,
};
pub use credentials::Credentials;
pub use domain::{Coin, Pair, UtcDateTime, DEFAULT_QUOTE_ASSET};
pub use error::{AggregationError, ConfigError, ValidationError};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};
pub use provider::{AuthScheme, ProviderCatalog, ProviderDescriptor, ProviderId};
pub use rotation::{
    AttemptFailure, ProviderAttempt, RotationFailure, RotationFetcher, RotationResult,
    RotationSuccess,
};
pub use signal::{
    weighted_confidence, AggregatedSignal, SignalLabel, SignalLevel, SignalMetrics, SignalSource,
    SIGNAL_TTL,
};
