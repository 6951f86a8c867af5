//! Commonly used re-exports for consumers of this crate.

pub use crate::orderbook::engine::OrderBook;
pub use crate::orderbook::errors::{EngineFault, ErrorSummary};
pub use crate::orderbook::order::{Order, OrderNode, Side};
pub use crate::orderbook::parser::{parse_line, OrderAction, ParseError, ParsedMessage};
pub use crate::orderbook::price::{parse_decimal_scaled, format_significant, PriceScaled, SCALE};
pub use crate::orderbook::snapshot;
