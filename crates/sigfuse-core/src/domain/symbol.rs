use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Long enough for CoinGecko-style slugs such as `ethereum-name-service`.
const MAX_COIN_LEN: usize = 64;
const MAX_PAIR_LEN: usize = MAX_COIN_LEN + 8;

/// Quote asset appended to a coin when no explicit pair is given.
pub const DEFAULT_QUOTE_ASSET: &str = "USDT";

/// Normalized coin ticker such as `BTC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coin(String);

/// Normalized trading pair such as `BTCUSDT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pair(String);

impl Coin {
    /// Parse and normalize a coin ticker or slug to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        normalize_symbol(input, MAX_COIN_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used by providers that key assets by slug.
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// The pair quoted against [`DEFAULT_QUOTE_ASSET`].
    pub fn default_pair(&self) -> Pair {
        Pair(format!("{}{DEFAULT_QUOTE_ASSET}", self.0))
    }
}

impl Pair {
    /// Parse and normalize a trading pair to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        normalize_symbol(input, MAX_PAIR_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn normalize_symbol(input: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptySymbol);
    }

    let normalized = trimmed.to_ascii_uppercase();
    let len = normalized.chars().count();
    if len > max {
        return Err(ValidationError::SymbolTooLong { len, max });
    }

    if let Some(first) = normalized.chars().next() {
        if !first.is_ascii_alphanumeric() {
            return Err(ValidationError::SymbolInvalidStart { ch: first });
        }
    }

    for (index, ch) in normalized.chars().enumerate() {
        let valid = ch.is_ascii_alphanumeric() || ch == '.' || ch == '-';
        if !valid {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }
    }

    Ok(normalized)
}

impl Display for Coin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Pair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Coin {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<String> for Pair {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Coin> for String {
    fn from(value: Coin) -> Self {
        value.0
    }
}

impl From<Pair> for String {
    fn from(value: Pair) -> Self {
        value.0
    }
}
