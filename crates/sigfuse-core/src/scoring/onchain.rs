use serde_json::Value;

use super::{finish, non_zero, number_at, require_object, ScoreResult, Unscorable};

/// Score an on-chain activity payload (`active_addresses`,
/// `transaction_volume`, `whale_activity`).
pub fn onchain_score(payload: &Value) -> f64 {
    finish(raw_onchain_score(payload))
}

fn raw_onchain_score(payload: &Value) -> ScoreResult {
    require_object(payload)?;

    let active_addresses = number_at(payload, &["active_addresses"])?;
    let transaction_volume = number_at(payload, &["transaction_volume"])?;
    let whale_activity = number_at(payload, &["whale_activity"])?;
    if active_addresses.is_none() && transaction_volume.is_none() && whale_activity.is_none() {
        return Err(Unscorable);
    }

    let active_addresses = non_zero(active_addresses).unwrap_or(0.0);
    let transaction_volume = non_zero(transaction_volume).unwrap_or(0.0);
    let whale_activity = non_zero(whale_activity).unwrap_or(0.0);

    let mut score = 50.0;
    score += if active_addresses > 100_000.0 {
        15.0
    } else if active_addresses > 10_000.0 {
        10.0
    } else {
        5.0
    };
    score += if transaction_volume > 1_000_000_000.0 {
        15.0
    } else if transaction_volume > 100_000_000.0 {
        10.0
    } else {
        5.0
    };
    score += if whale_activity > 50.0 {
        10.0
    } else if whale_activity > 20.0 {
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

    #[test]
    fn busy_network_scores_top_tiers() {
        let payload = json!({
            "active_addresses": 200_000,
            "transaction_volume": 5_000_000_000u64,
            "whale_activity": 60
        });
        assert_eq!(onchain_score(&payload), 90.0);
    }

    #[test]
    fn partial_payload_uses_floor_tiers() {
        assert_eq!(onchain_score(&json!({"whale_activity": 30})), 65.0);
    }

    #[test]
    fn mid_tiers_add_up() {
        let payload = json!({
            "active_addresses": 50_000,
            "transaction_volume": 200_000_000,
            "whale_activity": 5
        });
        assert_eq!(onchain_score(&payload), 70.0);
    }

    #[test]
    fn wrong_field_type_is_neutral() {
        assert_eq!(onchain_score(&json!({"active_addresses": {"count": 5}})), NEUTRAL_SCORE);
    }
}
