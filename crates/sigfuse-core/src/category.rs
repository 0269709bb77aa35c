//! Data categories and the request each one issues against its providers.
//!
//! | Category | Weight | Path | Query |
//! |----------|--------|------|-------|
//! | `price` | 0.20 | `/coins/{coin}` | `localization`, `tickers`, `market_data` |
//! | `exchange` | 0.15 | `/ticker/24hr` | `symbol={pair}` |
//! | `social` | 0.20 | `/assets` | `symbol={COIN}` |
//! | `onchain` | 0.25 | `/user/total_balance` | `id={coin}` |
//! | `technical` | 0.20 | `/v2/histoday` | `fsym`, `tsym`, `limit` |

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Coin, Pair, ValidationError};

/// Independent data domain feeding one [`SignalSource`](crate::SignalSource).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Price,
    Exchange,
    Social,
    Onchain,
    Technical,
}

impl Category {
    /// Every category, in the order sources are reported.
    pub const ALL: [Self; 5] = [
        Self::Price,
        Self::Exchange,
        Self::Social,
        Self::Onchain,
        Self::Technical,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Exchange => "exchange",
            Self::Social => "social",
            Self::Onchain => "onchain",
            Self::Technical => "technical",
        }
    }

    /// Fixed contribution to the weighted confidence. The five weights sum to 1.0.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Price => 0.20,
            Self::Exchange => 0.15,
            Self::Social => 0.20,
            Self::Onchain => 0.25,
            Self::Technical => 0.20,
        }
    }

    /// Build the endpoint path and ordered query parameters for `coin`/`pair`.
    pub fn request(self, coin: &Coin, pair: &Pair) -> CategoryRequest {
        match self {
            Self::Price => CategoryRequest::new(format!("/coins/{}", coin.to_lowercase()))
                .with_param("localization", false)
                .with_param("tickers", false)
                .with_param("market_data", true),
            Self::Exchange => CategoryRequest::new("/ticker/24hr").with_param("symbol", pair),
            Self::Social => CategoryRequest::new("/assets").with_param("symbol", coin),
            Self::Onchain => CategoryRequest::new("/user/total_balance")
                .with_param("id", coin.to_lowercase()),
            Self::Technical => CategoryRequest::new("/v2/histoday")
                .with_param("fsym", coin)
                .with_param("tsym", "USD")
                .with_param("limit", 30),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(Self::Price),
            "exchange" | "volume" => Ok(Self::Exchange),
            "social" => Ok(Self::Social),
            "onchain" | "on-chain" | "on_chain" => Ok(Self::Onchain),
            "technical" => Ok(Self::Technical),
            other => Err(ValidationError::InvalidCategory {
                value: other.to_owned(),
            }),
        }
    }
}

/// Provider-relative endpoint path plus query parameters in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl CategoryRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter; the value is stringified with `Display`.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }
}
