//! # Domain Types
//!
//! Validated identifiers and timestamps shared by the aggregation pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Coin`] | Coin ticker (`BTC`) |
//! | [`Pair`] | Trading pair (`BTCUSDT`) |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Symbols are trimmed and uppercased at construction; anything else is a
//! [`ValidationError`](crate::ValidationError).

mod symbol;
mod timestamp;

pub use symbol::{Coin, Pair, DEFAULT_QUOTE_ASSET};
pub use timestamp::UtcDateTime;
