use serde_json::Value;

use super::{as_number, finish, lookup, require_object, ScoreResult, Unscorable, NEUTRAL_SCORE};

/// Fewest closing prices the technical scorer will work with.
pub const MIN_CLOSES: usize = 14;

/// Score a daily history payload by RSI.
///
/// Closing prices are read from `Data[].close`, or `Data.Data[].close` for
/// the nested history envelope. Oversold (RSI < 30) maps to 80, overbought
/// (RSI > 70) to 20, anything between to `50 + (50 - RSI) / 2`. Fewer than
/// [`MIN_CLOSES`] closes is neutral.
pub fn technical_score(payload: &Value) -> f64 {
    finish(raw_technical_score(payload))
}

fn raw_technical_score(payload: &Value) -> ScoreResult {
    require_object(payload)?;

    let closes = closing_prices(payload)?;
    if closes.len() < MIN_CLOSES {
        return Ok(NEUTRAL_SCORE);
    }

    let rsi = relative_strength_index(&closes).ok_or(Unscorable)?;
    let score = if rsi < 30.0 {
        80.0
    } else if rsi > 70.0 {
        20.0
    } else {
        50.0 + (50.0 - rsi) / 2.0
    };

    Ok(score)
}

fn closing_prices(payload: &Value) -> Result<Vec<f64>, Unscorable> {
    let rows = match lookup(payload, &["Data"])? {
        None => return Ok(Vec::new()),
        Some(Value::Array(rows)) => rows,
        Some(nested @ Value::Object(_)) => match lookup(nested, &["Data"])? {
            None => return Ok(Vec::new()),
            Some(Value::Array(rows)) => rows,
            Some(_) => return Err(Unscorable),
        },
        Some(_) => return Err(Unscorable),
    };

    rows.iter()
        .map(|row| {
            if !row.is_object() {
                return Err(Unscorable);
            }
            as_number(lookup(row, &["close"])?)?.ok_or(Unscorable)
        })
        .collect()
}

/// RSI from the mean gain and mean loss over every consecutive pair of closes.
///
/// A mean loss of zero is replaced by one, so a series that only rises
/// reports `100 - 100 / (1 + mean_gain)`. Returns `None` for fewer than two
/// closes.
pub fn relative_strength_index(closes: &[f64]) -> Option<f64> {
    if closes.len() < 2 {
        return None;
    }

    let (gains, losses) = closes
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold((0.0, 0.0), |(gains, losses), diff| {
            if diff > 0.0 {
                (gains + diff, losses)
            } else {
                (gains, losses - diff)
            }
        });

    let periods = (closes.len() - 1) as f64;
    let avg_gain = gains / periods;
    let avg_loss = losses / periods;
    let divisor = if avg_loss == 0.0 { 1.0 } else { avg_loss };
    let rs = avg_gain / divisor;

    Some(100.0 - 100.0 / (1.0 + rs))
}
