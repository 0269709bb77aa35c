use serde_json::Value;

use super::{as_number, finish, lookup, number_at, require_object, ScoreResult, Unscorable};

/// Score a 24h ticker payload (`volume` or `quoteVolume`, `priceChangePercent`).
///
/// Exchanges usually send these as numeric strings. `quoteVolume` is only
/// consulted when `volume` is absent, empty or a numeric zero; a string
/// `"0"` is a real reading. Starts at 50, adds +20 / +10 for volume above
/// 1B / 100M and the percent change clamped to ±20.
pub fn volume_score(payload: &Value) -> f64 {
    finish(raw_volume_score(payload))
}

fn raw_volume_score(payload: &Value) -> ScoreResult {
    require_object(payload)?;

    let base_volume = lookup(payload, &["volume"])?;
    let quote_volume = lookup(payload, &["quoteVolume"])?;
    let price_change = number_at(payload, &["priceChangePercent"])?;
    if base_volume.is_none() && quote_volume.is_none() && price_change.is_none() {
        return Err(Unscorable);
    }

    let volume = match reported_volume(base_volume)? {
        Some(volume) => volume,
        None => reported_volume(quote_volume)?.unwrap_or(0.0),
    };
    let price_change = price_change.unwrap_or(0.0);

    let mut score = 50.0;
    score += if volume > 1_000_000_000.0 {
        20.0
    } else if volume > 100_000_000.0 {
        10.0
    } else {
        0.0
    };
    score += price_change.clamp(-20.0, 20.0);

    Ok(score)
}

/// A volume field counts as reported unless it is absent, empty or the number 0.
fn reported_volume(value: Option<&Value>) -> Result<Option<f64>, Unscorable> {
    match value {
        Some(Value::Number(number)) if number.as_f64() == Some(0.0) => Ok(None),
        other => as_number(other),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::scoring::NEUTRAL_SCORE;

    #[test]
    fn string_fields_from_binance_ticker_are_parsed() {
        let ticker = json!({"symbol": "BTCUSDT", "volume": "2000000000", "priceChangePercent": "25.0"});
        assert_eq!(volume_score(&ticker), 90.0);
    }

    #[test]
    fn string_zero_volume_is_a_real_reading() {
        let ticker = json!({"volume": "0", "quoteVolume": "150000000", "priceChangePercent": "-3.5"});
        assert_eq!(volume_score(&ticker), 46.5);
    }

    #[test]
    fn quote_volume_is_used_when_volume_is_numeric_zero() {
        let ticker = json!({"volume": 0, "quoteVolume": "150000000", "priceChangePercent": "-3.5"});
        assert_eq!(volume_score(&ticker), 56.5);
    }

    #[test]
    fn quote_volume_is_used_when_volume_is_missing_or_empty() {
        let missing = json!({"quoteVolume": 2_000_000_000u64});
        let empty = json!({"volume": "", "quoteVolume": "2000000000"});
        assert_eq!(volume_score(&missing), 70.0);
        assert_eq!(volume_score(&empty), 70.0);
    }

    #[test]
    fn quote_volume_is_ignored_once_volume_is_reported() {
        let ticker = json!({"volume": "5000", "quoteVolume": "not-a-number"});
        assert_eq!(volume_score(&ticker), 50.0);
    }

    #[test]
    fn heavy_selloff_on_thin_volume() {
        let ticker = json!({"volume": 1000, "priceChangePercent": -40});
        assert_eq!(volume_score(&ticker), 30.0);
    }

    #[test]
    fn unparsable_volume_is_neutral() {
        let ticker = json!({"volume": "lots", "priceChangePercent": "5"});
        assert_eq!(volume_score(&ticker), NEUTRAL_SCORE);
    }
}
