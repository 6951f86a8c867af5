//! Order record (C2): an immutable identity paired with mutable (qty, price).

use super::price::PriceScaled;
use std::fmt;

/// Which book this order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        })
    }
}

/// A resting limit order. `order_id` is the immutable identity; `qty` and
/// `px_scaled` are mutated in place by modifications that preserve time
/// priority (spec §4.3, law "quantity-down preserves priority").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub order_id: u32,
    pub side: Side,
    pub qty: u32,
    pub px_scaled: PriceScaled,
}

impl Order {
    /// Constructs a new order. Debug-asserts the invariants the engine
    /// relies on (`qty > 0`, `px_scaled > 0`) — callers (the parser and the
    /// engine's own reinsertion path) are expected to have validated these
    /// already, so violating them here is a programmer error, not a feed
    /// anomaly.
    #[must_use]
    pub fn new(order_id: u32, side: Side, qty: u32, px_scaled: PriceScaled) -> Self {
        debug_assert!(qty > 0, "order quantity must be positive");
        debug_assert!(px_scaled > 0, "order price must be positive");
        Order {
            order_id,
            side,
            qty,
            px_scaled,
        }
    }
}

/// A node in a price level's FIFO queue: an order tagged with the
/// monotonic arrival sequence assigned when it was (re-)inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderNode {
    pub order: Order,
    pub seq: u32,
}

impl OrderNode {
    #[must_use]
    pub fn new(order: Order, seq: u32) -> Self {
        OrderNode { order, seq }
    }
}
