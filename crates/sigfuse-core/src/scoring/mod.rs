//! # Category Scorers
//!
//! Pure functions mapping a provider's raw JSON payload to a confidence in
//! `[0, 100]`. Scorers never fail: a payload of the wrong shape, an
//! unparsable number, or a payload carrying none of the fields a scorer reads
//! all produce [`NEUTRAL_SCORE`], so a broken provider only weakens its own
//! category.
//!
//! Missing individual fields fall back to per-field defaults, and a field
//! whose value is `0` is treated like a missing one (numeric strings such as
//! `"12.5"` are accepted wherever a number is expected).
//!
//! | Scorer | Category |
//! |--------|----------|
//! | [`price_score`] | price |
//! | [`volume_score`] | exchange |
//! | [`social_score`] | social |
//! | [`onchain_score`] | onchain |
//! | [`technical_score`] | technical |

mod onchain;
mod price;
mod social;
mod technical;
mod volume;

pub use onchain::onchain_score;
pub use price::price_score;
pub use social::social_score;
pub use technical::{relative_strength_index, technical_score, MIN_CLOSES};
pub use volume::volume_score;

use serde_json::Value;

use crate::Category;

/// Score reported when a payload cannot be interpreted.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Run the scorer that belongs to `category`.
pub fn score(category: Category, payload: &Value) -> f64 {
    match category {
        Category::Price => price_score(payload),
        Category::Exchange => volume_score(payload),
        Category::Social => social_score(payload),
        Category::Onchain => onchain_score(payload),
        Category::Technical => technical_score(payload),
    }
}

/// Payload could not be scored; the caller reports [`NEUTRAL_SCORE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unscorable;

pub(crate) type ScoreResult = Result<f64, Unscorable>;

/// Clamp to `[0, 100]`; non-finite results are unscorable.
pub(crate) fn finish(raw: ScoreResult) -> f64 {
    match raw {
        Ok(value) if value.is_finite() => value.clamp(0.0, 100.0),
        _ => NEUTRAL_SCORE,
    }
}

/// Follow `path` through nested objects. `null` or an absent key ends the walk
/// with `None`; stepping into a non-object is unscorable.
pub(crate) fn lookup<'a>(payload: &'a Value, path: &[&str]) -> Result<Option<&'a Value>, Unscorable> {
    let mut current = payload;
    for segment in path {
        match current {
            Value::Object(map) => match map.get(*segment) {
                Some(next) => current = next,
                None => return Ok(None),
            },
            Value::Null => return Ok(None),
            _ => return Err(Unscorable),
        }
    }

    if current.is_null() {
        Ok(None)
    } else {
        Ok(Some(current))
    }
}

/// Interpret a JSON value as a finite number. Empty strings count as absent.
pub(crate) fn as_number(value: Option<&Value>) -> Result<Option<f64>, Unscorable> {
    match value {
        None => Ok(None),
        Some(Value::Number(number)) => number.as_f64().filter(|n| n.is_finite()).map(Some).ok_or(Unscorable),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or(Unscorable),
        Some(_) => Err(Unscorable),
    }
}

pub(crate) fn number_at(payload: &Value, path: &[&str]) -> Result<Option<f64>, Unscorable> {
    as_number(lookup(payload, path)?)
}

/// Keep a present, non-zero value; zero behaves like a missing field.
pub(crate) fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|n| *n != 0.0)
}

/// Top-level payload must be a JSON object.
pub(crate) fn require_object(payload: &Value) -> Result<(), Unscorable> {
    if payload.is_object() {
        Ok(())
    } else {
        Err(Unscorable)
    }
}
