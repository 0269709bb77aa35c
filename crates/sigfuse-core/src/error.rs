use thiserror::Error;

use crate::Category;

/// Validation and contract errors exposed by `sigfuse-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or digit: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("provider id cannot be empty")]
    EmptyProviderId,
    #[error("provider id contains invalid character '{ch}': '{value}'")]
    InvalidProviderId { value: String, ch: char },

    #[error("invalid category '{value}', expected one of price, exchange, onchain, social, technical")]
    InvalidCategory { value: String },

    #[error("provider '{id}' base url must start with http:// or https://: '{value}'")]
    InvalidBaseUrl { id: String, value: String },
    #[error("field '{field}' must be greater than zero")]
    NonPositiveValue { field: &'static str },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
}

/// Errors raised while assembling an [`AggregatorConfig`](crate::AggregatorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Category-level failure surfaced by the rotation layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("all sources failed for category: {category}")]
    AllSourcesFailed { category: Category },
}
