use serde_json::Value;

use super::{finish, non_zero, number_at, require_object, ScoreResult, Unscorable};

/// Score a market-data payload (`market_data.price_change_percentage_24h`,
/// `market_data.price_change_percentage_7d`, `market_data.total_volume.usd`).
///
/// Starts at 50, adds the 24h change clamped to ±20, half the 7d change
/// clamped to ±15, and +10 / +5 for USD volume above 1B / 100M.
pub fn price_score(payload: &Value) -> f64 {
    finish(raw_price_score(payload))
}

fn raw_price_score(payload: &Value) -> ScoreResult {
    require_object(payload)?;

    let change_24h = number_at(payload, &["market_data", "price_change_percentage_24h"])?;
    let change_7d = number_at(payload, &["market_data", "price_change_percentage_7d"])?;
    let volume = number_at(payload, &["market_data", "total_volume", "usd"])?;
    if change_24h.is_none() && change_7d.is_none() && volume.is_none() {
        return Err(Unscorable);
    }

    let change_24h = non_zero(change_24h).unwrap_or(0.0);
    let change_7d = non_zero(change_7d).unwrap_or(0.0);
    let volume = non_zero(volume).unwrap_or(0.0);

    let mut score = 50.0;
    score += change_24h.clamp(-20.0, 20.0);
    score += (change_7d / 2.0).clamp(-15.0, 15.0);
    score += if volume > 1_000_000_000.0 {
        10.0
    } else if volume > 100_000_000.0 {
        5.0
    } else {
        0.0
    };

    Ok(score)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::scoring::NEUTRAL_SCORE;

    fn payload(change_24h: f64, change_7d: f64, volume: f64) -> Value {
        json!({
            "market_data": {
                "price_change_percentage_24h": change_24h,
                "price_change_percentage_7d": change_7d,
                "total_volume": {"usd": volume}
            }
        })
    }

    #[test]
    fn moderate_rally_with_large_volume() {
        assert_eq!(price_score(&payload(5.0, 10.0, 2_000_000_000.0)), 70.0);
    }

    #[test]
    fn changes_are_clamped_to_their_limits() {
        assert_eq!(price_score(&payload(50.0, 100.0, 2_000_000_000.0)), 95.0);
        assert_eq!(price_score(&payload(-50.0, -100.0, 0.0)), 15.0);
    }

    #[test]
    fn mid_tier_volume_adds_five() {
        assert_eq!(price_score(&payload(0.0, 0.0, 500_000_000.0)), 55.0);
    }

    #[test]
    fn market_data_of_wrong_type_is_neutral() {
        assert_eq!(price_score(&json!({"market_data": "n/a"})), NEUTRAL_SCORE);
        assert_eq!(
            price_score(&json!({"market_data": {"price_change_percentage_24h": [1]}})),
            NEUTRAL_SCORE
        );
    }
}
