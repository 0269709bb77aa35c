//! In-memory cache for aggregated signals.
//!
//! Entries are keyed by `(coin, pair)` and live until the signal's own
//! `expires_at`; there is no separate TTL.

use std::collections::HashMap;
use std::sync::Arc;

use crate::signal::AggregatedSignal;
use crate::{Coin, Pair, UtcDateTime};

type CacheKey = (Coin, Pair);

#[derive(Debug, Default)]
struct CacheInner {
    map: HashMap<CacheKey, AggregatedSignal>,
}

impl CacheInner {
    fn get(&self, key: &CacheKey, now: UtcDateTime) -> Option<AggregatedSignal> {
        self.map
            .get(key)
            .filter(|signal| !signal.is_expired_at(now))
            .cloned()
    }

    fn put(&mut self, signal: AggregatedSignal) {
        let key = (signal.coin.clone(), signal.pair.clone());
        self.map.insert(key, signal);
    }

    fn clear_expired(&mut self, now: UtcDateTime) {
        self.map.retain(|_, signal| !signal.is_expired_at(now));
    }
}

/// Thread-safe signal cache, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct SignalCache {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

impl SignalCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached signal for `(coin, pair)` if present and not yet expired.
    pub async fn get(&self, coin: &Coin, pair: &Pair) -> Option<AggregatedSignal> {
        self.get_at(coin, pair, UtcDateTime::now()).await
    }

    pub async fn get_at(&self, coin: &Coin, pair: &Pair, now: UtcDateTime) -> Option<AggregatedSignal> {
        let store = self.inner.read().await;
        store.get(&(coin.clone(), pair.clone()), now)
    }

    /// Store `signal`, replacing any earlier entry for its `(coin, pair)`.
    pub async fn put(&self, signal: AggregatedSignal) {
        let mut store = self.inner.write().await;
        store.put(signal);
    }

    pub async fn clear_expired(&self) {
        self.clear_expired_at(UtcDateTime::now()).await;
    }

    pub async fn clear_expired_at(&self, now: UtcDateTime) {
        let mut store = self.inner.write().await;
        store.clear_expired(now);
    }

    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.map.clear();
    }

    /// Number of entries, expired ones included.
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
