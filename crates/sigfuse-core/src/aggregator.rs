//! Multi-source signal combiner.
//!
//! One aggregation fetches all five categories concurrently through the
//! [`RotationFetcher`], scores each payload, and folds the answering
//! categories into an [`AggregatedSignal`]. A failing category is dropped
//! from the weighting; if every category fails the result is a neutral
//! `HOLD` at 50 with no sources.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::Instrument;
use uuid::Uuid;

use crate::cache::SignalCache;
use crate::config::AggregatorConfig;
use crate::http_client::HttpClient;
use crate::rotation::RotationFetcher;
use crate::scoring;
use crate::signal::{AggregatedSignal, SignalSource};
use crate::{Category, Coin, Pair, UtcDateTime, ValidationError};

#[derive(Clone)]
pub struct SignalAggregator {
    fetcher: RotationFetcher,
}

impl SignalAggregator {
    /// Aggregator backed by the reqwest transport.
    pub fn new(config: Arc<AggregatorConfig>) -> Self {
        Self {
            fetcher: RotationFetcher::new(config),
        }
    }

    pub fn with_http_client(config: Arc<AggregatorConfig>, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            fetcher: RotationFetcher::with_http_client(config, http_client),
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        self.fetcher.config()
    }

    pub async fn generate_aggregated_signal(&self, coin: &Coin, pair: &Pair) -> AggregatedSignal {
        let span = tracing::info_span!(
            "aggregate",
            request_id = %Uuid::new_v4(),
            coin = %coin,
            pair = %pair
        );

        async {
            let (price, exchange, social, onchain, technical) = tokio::join!(
                self.category_source(Category::Price, coin, pair),
                self.category_source(Category::Exchange, coin, pair),
                self.category_source(Category::Social, coin, pair),
                self.category_source(Category::Onchain, coin, pair),
                self.category_source(Category::Technical, coin, pair),
            );

            let sources = [price, exchange, social, onchain, technical]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>();

            let signal =
                AggregatedSignal::from_sources(coin.clone(), pair.clone(), sources, UtcDateTime::now());

            if signal.is_degraded() {
                tracing::warn!("no category answered; returning neutral signal");
            } else {
                tracing::info!(
                    signal = signal.signal.as_str(),
                    confidence = signal.confidence,
                    sources = signal.sources.len(),
                    "aggregated signal"
                );
            }

            signal
        }
        .instrument(span)
        .await
    }

    async fn category_source(&self, category: Category, coin: &Coin, pair: &Pair) -> Option<SignalSource> {
        let request = category.request(coin, pair);
        let success = self.fetcher.fetch_category(category, &request).await.ok()?;
        let confidence = scoring::score(category, &success.data);

        tracing::debug!(%category, source = %success.source, confidence, "scored category");
        Some(SignalSource::new(success.source, category, confidence, success.data))
    }

    /// Live cached signal for `(coin, pair)`, or a freshly generated one that is then cached.
    pub async fn cached_signal(&self, cache: &SignalCache, coin: &Coin, pair: &Pair) -> AggregatedSignal {
        if let Some(signal) = cache.get(coin, pair).await {
            tracing::debug!(%coin, %pair, "signal cache hit");
            return signal;
        }

        let signal = self.generate_aggregated_signal(coin, pair).await;
        cache.put(signal.clone()).await;
        signal
    }

    /// Aggregate many coins concurrently. Results keep the input order;
    /// entries with an invalid coin or pair are counted as failed.
    pub async fn generate_batch(&self, entries: &[BatchEntry]) -> BatchReport {
        let mut rejected = Vec::new();
        let mut tasks = JoinSet::new();

        for (index, entry) in entries.iter().enumerate() {
            match entry.resolve() {
                Ok((coin, pair)) => {
                    let aggregator = self.clone();
                    tasks.spawn(async move {
                        let signal = aggregator.generate_aggregated_signal(&coin, &pair).await;
                        (index, signal)
                    });
                }
                Err(error) => {
                    tracing::warn!(coin = %entry.coin, %error, "rejected batch entry");
                    rejected.push(RejectedEntry {
                        coin: entry.coin.clone(),
                        pair: entry.pair.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        let mut completed = Vec::with_capacity(tasks.len());
        let mut crashed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => completed.push(result),
                Err(error) => {
                    tracing::warn!(%error, "batch aggregation task aborted");
                    crashed += 1;
                }
            }
        }
        completed.sort_by_key(|(index, _)| *index);

        let signals = completed
            .into_iter()
            .map(|(_, signal)| signal)
            .collect::<Vec<_>>();

        BatchReport {
            total: entries.len(),
            successful: signals.len(),
            failed: rejected.len() + crashed,
            signals,
            rejected,
        }
    }
}

/// Unvalidated batch request item; `pair` defaults to `<COIN>USDT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub coin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
}

impl BatchEntry {
    pub fn new(coin: impl Into<String>) -> Self {
        Self {
            coin: coin.into(),
            pair: None,
        }
    }

    pub fn with_pair(mut self, pair: impl Into<String>) -> Self {
        self.pair = Some(pair.into());
        self
    }

    pub fn resolve(&self) -> Result<(Coin, Pair), ValidationError> {
        let coin = Coin::parse(&self.coin)?;
        let pair = match &self.pair {
            Some(pair) => Pair::parse(pair)?,
            None => coin.default_pair(),
        };
        Ok((coin, pair))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedEntry {
    pub coin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub signals: Vec<AggregatedSignal>,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedEntry>,
}
