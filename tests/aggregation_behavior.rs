//! Behaviour tests for the signal combiner.
//!
//! Each category is served by its own scripted provider (`https://<category>.test`)
//! so a test decides exactly which categories answer and with what payload.

mod support;

use std::sync::Arc;

use serde_json::{json, Value};
use sigfuse_core::{
    AggregatedSignal, BatchEntry, Category, Coin, Pair, SignalAggregator, SignalCache, SignalLabel,
    SignalLevel, UtcDateTime,
};

use support::{id, per_category_config, shared, ScriptedHttpClient};

fn aggregator(client: &Arc<ScriptedHttpClient>) -> SignalAggregator {
    let config = shared(per_category_config().build().expect("config"));
    SignalAggregator::with_http_client(config, client.clone())
}

fn btc() -> (Coin, Pair) {
    let coin = Coin::parse("BTC").expect("valid coin");
    let pair = coin.default_pair();
    (coin, pair)
}

fn price_payload(change_24h: f64, change_7d: f64, volume: f64) -> Value {
    json!({
        "market_data": {
            "price_change_percentage_24h": change_24h,
            "price_change_percentage_7d": change_7d,
            "total_volume": {"usd": volume}
        }
    })
}

fn rising_history(step: f64) -> Value {
    let rows = (0..30)
        .map(|i| json!({"close": 100.0 + step * f64::from(i)}))
        .collect::<Vec<_>>();
    json!({"Response": "Success", "Data": rows})
}

// =============================================================================
// Combiner: partial and total failure
// =============================================================================

#[tokio::test]
async fn when_only_some_categories_answer_confidence_is_renormalized_over_them() {
    // Given: price scores 80 and onchain scores 60; the rest fail
    let client = Arc::new(
        ScriptedHttpClient::new()
            .json("https://price.test", price_payload(20.0, 0.0, 2_000_000_000.0))
            .json("https://onchain.test", json!({"whale_activity": 10}))
            .status("https://exchange.test", 500)
            .status("https://social.test", 429),
    );
    let (coin, pair) = btc();

    // When: an aggregated signal is generated
    let signal = aggregator(&client).generate_aggregated_signal(&coin, &pair).await;

    // Then: confidence = (80*0.20 + 60*0.25) / 0.45 and the level is BUY
    assert!((signal.confidence - 31.0 / 0.45).abs() < 1e-9, "{}", signal.confidence);
    assert_eq!(signal.signal, SignalLevel::Buy);

    // And: sources are in category order, tagged and labelled
    let categories = signal.sources.iter().map(|s| s.category).collect::<Vec<_>>();
    assert_eq!(categories, vec![Category::Price, Category::Onchain]);
    assert_eq!(signal.sources[0].name, id("price"));
    assert_eq!(signal.sources[0].signal, SignalLabel::Buy);
    assert_eq!(signal.sources[0].weight, 0.20);
    assert_eq!(signal.sources[1].signal, SignalLabel::Hold);
    assert_eq!(signal.sources[1].data, json!({"whale_activity": 10}));

    // And: metrics come from the category tags, missing ones are neutral
    assert_eq!(signal.metrics.price_score, 80.0);
    assert_eq!(signal.metrics.on_chain_score, 60.0);
    assert_eq!(signal.metrics.volume_score, 50.0);
    assert_eq!(signal.metrics.social_score, 50.0);
    assert_eq!(signal.metrics.technical_score, 50.0);
    assert_eq!(signal.metrics.derivatives_score, 50.0);
}

#[tokio::test]
async fn when_every_category_fails_signal_is_neutral_hold() {
    // Given: a transport with no routes at all
    let client = Arc::new(ScriptedHttpClient::new());
    let (coin, pair) = btc();

    // When: an aggregated signal is generated
    let signal = aggregator(&client).generate_aggregated_signal(&coin, &pair).await;

    // Then: it is HOLD at 50 with no sources, and still expires in five minutes
    assert_eq!(signal.signal, SignalLevel::Hold);
    assert_eq!(signal.confidence, 50.0);
    assert!(signal.sources.is_empty());
    assert!(signal.is_degraded());
    assert_eq!(signal.expires_at.millis_since(signal.timestamp), 300_000);

    // And: every category was attempted exactly once
    assert_eq!(client.requests().len(), 5);
}

#[tokio::test]
async fn when_answering_categories_are_bearish_signal_is_sell() {
    // Given: falling price, weak ticker, overbought history; social and onchain fail
    let client = Arc::new(
        ScriptedHttpClient::new()
            .json("https://price.test", price_payload(-50.0, -100.0, 0.0))
            .json(
                "https://exchange.test",
                json!({"volume": "10", "priceChangePercent": "-35.0"}),
            )
            .json("https://technical.test", rising_history(5.0)),
    );
    let (coin, pair) = btc();

    // When: an aggregated signal is generated
    let signal = aggregator(&client).generate_aggregated_signal(&coin, &pair).await;

    // Then: (15*0.20 + 30*0.15 + 20*0.20) / 0.55 lands in SELL
    assert!((signal.confidence - 11.5 / 0.55).abs() < 1e-9, "{}", signal.confidence);
    assert_eq!(signal.signal, SignalLevel::Sell);

    let labels = signal.sources.iter().map(|s| s.signal).collect::<Vec<_>>();
    assert_eq!(labels, vec![SignalLabel::Sell, SignalLabel::Hold, SignalLabel::Sell]);
}

#[tokio::test]
async fn when_payloads_are_malformed_categories_still_count_at_neutral() {
    // Given: every category answers with a JSON shape no scorer understands
    let client = Arc::new(
        ScriptedHttpClient::new()
            .json("https://price.test", json!([1, 2, 3]))
            .json("https://exchange.test", json!("closed"))
            .json("https://social.test", json!({"sentiment": {"nested": true}}))
            .json("https://onchain.test", json!(null))
            .json("https://technical.test", json!({"Data": "unavailable"})),
    );
    let (coin, pair) = btc();

    // When: an aggregated signal is generated
    let signal = aggregator(&client).generate_aggregated_signal(&coin, &pair).await;

    // Then: all five sources are present at 50 and the result is HOLD
    assert_eq!(signal.sources.len(), 5);
    assert!(signal.sources.iter().all(|source| source.confidence == 50.0));
    assert_eq!(signal.confidence, 50.0);
    assert_eq!(signal.signal, SignalLevel::Hold);
}

#[tokio::test]
async fn when_inputs_repeat_outputs_repeat_except_for_timestamps() {
    // Given: a fixed set of provider payloads
    let client = Arc::new(
        ScriptedHttpClient::new()
            .json("https://price.test", price_payload(3.5, -4.0, 500_000_000.0))
            .json("https://social.test", json!({"galaxy_score": 61, "social_volume": 2500, "alt_rank": 75}))
            .json("https://technical.test", rising_history(2.0)),
    );
    let aggregator = aggregator(&client);
    let (coin, pair) = btc();

    // When: the same signal is generated twice
    let first = aggregator.generate_aggregated_signal(&coin, &pair).await;
    let second = aggregator.generate_aggregated_signal(&coin, &pair).await;

    // Then: everything but the timestamps matches
    let strip = |signal: AggregatedSignal| {
        let epoch = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("timestamp");
        AggregatedSignal {
            timestamp: epoch,
            expires_at: epoch,
            ..signal
        }
    };
    assert_eq!(strip(first), strip(second));
}

// =============================================================================
// Combiner: request shape per category
// =============================================================================

#[tokio::test]
async fn each_category_requests_its_own_endpoint() {
    // Given: a transport with no routes
    let client = Arc::new(ScriptedHttpClient::new());
    let coin = Coin::parse("eth").expect("valid coin");
    let pair = Pair::parse("ethbtc").expect("valid pair");

    // When: an aggregated signal is generated
    aggregator(&client).generate_aggregated_signal(&coin, &pair).await;

    // Then: each provider saw the category-specific path and parameters
    let mut urls = client.urls();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            "https://exchange.test/ticker/24hr?symbol=ETHBTC",
            "https://onchain.test/user/total_balance?id=eth",
            "https://price.test/coins/eth?localization=false&tickers=false&market_data=true",
            "https://social.test/assets?symbol=ETH",
            "https://technical.test/v2/histoday?fsym=ETH&tsym=USD&limit=30",
        ]
    );
}

// =============================================================================
// Batch and cache
// =============================================================================

#[tokio::test]
async fn batch_keeps_input_order_and_counts_rejected_entries_as_failed() {
    // Given: two valid entries around an invalid one
    let client = Arc::new(ScriptedHttpClient::new().json("https://price.test", price_payload(1.0, 0.0, 0.0)));
    let entries = vec![
        BatchEntry::new("btc"),
        BatchEntry::new("not a coin"),
        BatchEntry::new("eth").with_pair("ethbtc"),
    ];

    // When: the batch runs
    let report = aggregator(&client).generate_batch(&entries).await;

    // Then: totals add up and signals follow input order
    assert_eq!(report.total, 3);
    assert_eq!(report.successful, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.signals[0].pair.as_str(), "BTCUSDT");
    assert_eq!(report.signals[1].coin.as_str(), "ETH");
    assert_eq!(report.signals[1].pair.as_str(), "ETHBTC");

    // And: the rejected entry is reported with its reason
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].coin, "not a coin");
    assert!(!report.rejected[0].reason.is_empty());
}

#[tokio::test]
async fn empty_batch_reports_zero_totals() {
    let client = Arc::new(ScriptedHttpClient::new());

    let report = aggregator(&client).generate_batch(&[]).await;

    assert_eq!((report.total, report.successful, report.failed), (0, 0, 0));
    assert!(report.signals.is_empty());
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn cached_signal_is_reused_until_it_expires() {
    // Given: an empty cache and a working price provider
    let client = Arc::new(ScriptedHttpClient::new().json("https://price.test", price_payload(5.0, 10.0, 0.0)));
    let aggregator = aggregator(&client);
    let cache = SignalCache::new();
    let (coin, pair) = btc();

    // When: the signal is requested twice
    let first = aggregator.cached_signal(&cache, &coin, &pair).await;
    let second = aggregator.cached_signal(&cache, &coin, &pair).await;

    // Then: providers were contacted only for the first call
    assert_eq!(first, second);
    assert_eq!(client.requests().len(), 5);
    assert_eq!(cache.len().await, 1);

    // And: once expired, the cached entry is no longer served
    assert!(cache.get_at(&coin, &pair, first.expires_at).await.is_none());
}
