//! `lob_feed_engine` — a single-instrument limit order book engine and the
//! feed-replay machinery around it: fixed-point prices, price-time
//! priority, crossed-book detection, deterministic expected-trade
//! projection, and structured anomaly accounting.
//!
//! The book engine itself ([`orderbook::OrderBook`]) is the core; the line
//! parser and snapshot renderer are its external collaborators.

pub mod orderbook;
pub mod prelude;
