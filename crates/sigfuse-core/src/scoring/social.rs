use serde_json::Value;

use super::{finish, non_zero, number_at, require_object, ScoreResult, Unscorable};

const DEFAULT_SENTIMENT: f64 = 50.0;
const DEFAULT_ALT_RANK: f64 = 500.0;

/// Score a social-metrics payload (`sentiment` or `galaxy_score`,
/// `social_volume`, `alt_rank`).
///
/// Starts at the sentiment (50 when neither score is given), then adds
/// +15 / +10 / +5 by social volume (>10k, >1k, otherwise) and +15 / +10 / +5
/// by alt rank (<50, <100, otherwise).
pub fn social_score(payload: &Value) -> f64 {
    finish(raw_social_score(payload))
}

fn raw_social_score(payload: &Value) -> ScoreResult {
    require_object(payload)?;

    let sentiment = number_at(payload, &["sentiment"])?;
    let galaxy_score = number_at(payload, &["galaxy_score"])?;
    let social_volume = number_at(payload, &["social_volume"])?;
    let alt_rank = number_at(payload, &["alt_rank"])?;
    if sentiment.is_none() && galaxy_score.is_none() && social_volume.is_none() && alt_rank.is_none() {
        return Err(Unscorable);
    }

    let sentiment = non_zero(sentiment)
        .or(non_zero(galaxy_score))
        .unwrap_or(DEFAULT_SENTIMENT);
    let social_volume = non_zero(social_volume).unwrap_or(0.0);
    let alt_rank = non_zero(alt_rank).unwrap_or(DEFAULT_ALT_RANK);

    let mut score = sentiment;
    score += if social_volume > 10_000.0 {
        15.0
    } else if social_volume > 1_000.0 {
        10.0
    } else {
        5.0
    };
    score += if alt_rank < 50.0 {
        15.0
    } else if alt_rank < 100.0 {
        10.0
    } else {
        5.0
    };

    Ok(score)
}
