//! Signal value types produced by the aggregator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Duration;

use crate::provider::ProviderId;
use crate::scoring::NEUTRAL_SCORE;
use crate::{Category, Coin, Pair, UtcDateTime};

/// How long an aggregated signal stays valid.
pub const SIGNAL_TTL: Duration = Duration::minutes(5);

/// Per-category verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalLabel {
    Buy,
    Hold,
    Sell,
}

impl SignalLabel {
    /// `Buy` above 70, `Sell` below 30, `Hold` otherwise.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 70.0 {
            Self::Buy
        } else if confidence < 30.0 {
            Self::Sell
        } else {
            Self::Hold
        }
    }
}

/// Five-level aggregated recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalLevel {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl SignalLevel {
    /// Thresholds checked in order: >=80, >=60, <=20, <=40, otherwise `Hold`.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 80.0 {
            Self::StrongBuy
        } else if confidence >= 60.0 {
            Self::Buy
        } else if confidence <= 20.0 {
            Self::StrongSell
        } else if confidence <= 40.0 {
            Self::Sell
        } else {
            Self::Hold
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG_BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG_SELL",
        }
    }
}

/// One category that answered during an aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSource {
    /// Provider that served the category.
    pub name: ProviderId,
    pub category: Category,
    pub weight: f64,
    pub signal: SignalLabel,
    pub confidence: f64,
    /// Raw provider payload, kept for audit.
    pub data: Value,
}

impl SignalSource {
    pub fn new(name: ProviderId, category: Category, confidence: f64, data: Value) -> Self {
        Self {
            name,
            category,
            weight: category.weight(),
            signal: SignalLabel::from_confidence(confidence),
            confidence,
            data,
        }
    }
}

/// Per-category score summary; 50 for categories that did not answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalMetrics {
    pub price_score: f64,
    pub volume_score: f64,
    pub social_score: f64,
    pub on_chain_score: f64,
    pub technical_score: f64,
    /// No derivatives category is fetched yet; always neutral.
    pub derivatives_score: f64,
}

impl Default for SignalMetrics {
    fn default() -> Self {
        Self {
            price_score: NEUTRAL_SCORE,
            volume_score: NEUTRAL_SCORE,
            social_score: NEUTRAL_SCORE,
            on_chain_score: NEUTRAL_SCORE,
            technical_score: NEUTRAL_SCORE,
            derivatives_score: NEUTRAL_SCORE,
        }
    }
}

impl SignalMetrics {
    pub fn from_sources(sources: &[SignalSource]) -> Self {
        let score_for = |category: Category| {
            sources
                .iter()
                .find(|source| source.category == category)
                .map(|source| source.confidence)
                .unwrap_or(NEUTRAL_SCORE)
        };

        Self {
            price_score: score_for(Category::Price),
            volume_score: score_for(Category::Exchange),
            social_score: score_for(Category::Social),
            on_chain_score: score_for(Category::Onchain),
            technical_score: score_for(Category::Technical),
            derivatives_score: NEUTRAL_SCORE,
        }
    }
}

/// `Σ(confidence·weight) / Σweight` over the sources that answered; 50 when none did.
pub fn weighted_confidence(sources: &[SignalSource]) -> f64 {
    let total_weight: f64 = sources.iter().map(|source| source.weight).sum();
    if total_weight <= 0.0 {
        return NEUTRAL_SCORE;
    }

    let weighted: f64 = sources
        .iter()
        .map(|source| source.confidence * source.weight)
        .sum();
    weighted / total_weight
}

/// Final output of one aggregation. Safe to cache by `(coin, pair)` until `expires_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSignal {
    pub coin: Coin,
    pub pair: Pair,
    pub signal: SignalLevel,
    pub confidence: f64,
    pub sources: Vec<SignalSource>,
    pub metrics: SignalMetrics,
    pub timestamp: UtcDateTime,
    pub expires_at: UtcDateTime,
}

impl AggregatedSignal {
    /// Combine `sources` into a signal stamped at `timestamp`.
    pub fn from_sources(coin: Coin, pair: Pair, sources: Vec<SignalSource>, timestamp: UtcDateTime) -> Self {
        let confidence = weighted_confidence(&sources);
        Self {
            coin,
            pair,
            signal: SignalLevel::from_confidence(confidence),
            confidence,
            metrics: SignalMetrics::from_sources(&sources),
            sources,
            timestamp,
            expires_at: timestamp.saturating_add(SIGNAL_TTL),
        }
    }

    /// No category answered; the signal is the neutral default.
    pub fn is_degraded(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn is_expired_at(&self, now: UtcDateTime) -> bool {
        now >= self.expires_at
    }
}
