//! The book engine (C5): owns both sides, the order directory, the trade
//! aggregate, and the running [`ErrorSummary`]. This is where every
//! invariant and law in spec §4 and §8 is actually enforced.
//!
//! Every public method is a transaction boundary: it either completes with
//! a fully-consistent book, or it records an anomaly (feed-level) / fault
//! (internal) and leaves the book exactly as it was before the call. The
//! two concerns are deliberately not conflated — see [`super::errors`].

use std::collections::{HashMap, VecDeque};

use tracing::{trace, warn};

use super::errors::{EngineFault, ErrorSummary};
use super::matching::project_expected_trades;
use super::order::{Order, Side};
use super::pool::EnginePool;
use super::price::{PriceScaled, SCALE};
use super::side::{BuySide, SellSide};
use super::trade::TradeAggregate;

#[derive(Debug, Clone, Copy)]
struct OrderLocation {
    side: Side,
    px_scaled: PriceScaled,
}

/// A single-instrument limit order book plus everything needed to replay a
/// feed against it and classify the result.
#[derive(Debug, Default)]
pub struct OrderBook {
    buys: BuySide,
    sells: SellSide,
    directory: HashMap<u32, OrderLocation>,
    pool: EnginePool,
    next_seq: u32,
    /// Set when a fresh top-of-book level appears on a crossed book; cleared
    /// once the resulting expected-trade vector has been projected.
    expecting_trades: bool,
    expected_trades: VecDeque<(u32, u32)>,
    trade_aggregate: TradeAggregate,
    errors: ErrorSummary,
}

impl OrderBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn errors(&self) -> &ErrorSummary {
        &self.errors
    }

    /// The midpoint of best bid and best ask, or `None` if either side is
    /// empty. Deliberately computed fresh from the current tops rather than
    /// cached: it changes exactly when a top changes, so a cache would
    /// carry the same value a direct computation does, with more state to
    /// keep in sync for no benefit.
    #[must_use]
    pub fn mid(&self) -> Option<f64> {
        match (self.buys.top_price(), self.sells.top_price()) {
            (Some(bid), Some(ask)) => {
                Some((f64::from(bid) + f64::from(ask)) / (2.0 * f64::from(SCALE)))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_crossed(&self) -> bool {
        match (self.buys.top_price(), self.sells.top_price()) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }

    /// `true` while the engine still owes the feed a trade report: either a
    /// fresh cross has not yet had its expected-trade vector projected, or
    /// that vector has trades left in it.
    #[must_use]
    pub fn waiting_for_trades(&self) -> bool {
        self.expecting_trades || !self.expected_trades.is_empty()
    }

    #[must_use]
    pub fn buys(&self) -> &BuySide {
        &self.buys
    }

    #[must_use]
    pub fn sells(&self) -> &SellSide {
        &self.sells
    }

    #[must_use]
    pub fn contains_order(&self, order_id: u32) -> bool {
        self.directory.contains_key(&order_id)
    }

    /// Records a structural parse failure (spec §4.6's `Corrupted` class).
    /// Parser-level, so it never touches book state or the arrival
    /// pre-check.
    pub fn record_corrupted(&mut self) {
        self.errors.corrupted += 1;
        warn!("corrupted input line");
    }

    /// Records a parseable-but-invalid line (spec §4.6's `OutOfBounds`
    /// class).
    pub fn record_out_of_bounds(&mut self) {
        self.errors.out_of_bounds += 1;
        warn!("out-of-bounds input line");
    }

    fn allocate_seq(&mut self) -> u32 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// An order or modification that arrives while `waiting_for_trades()`
    /// is true on a still-crossed book is itself an anomaly, but never
    /// blocks — the message is still processed (spec §4.2's pre-check).
    fn order_arrival_precheck(&mut self) {
        if self.is_crossed() && self.waiting_for_trades() {
            self.errors.no_trades_when_expected += 1;
            warn!("order message arrived while expected trades were still outstanding");
        }
    }

    fn get_order(&self, side: Side, px_scaled: PriceScaled, order_id: u32) -> Option<Order> {
        let level = match side {
            Side::Buy => self.buys.get(px_scaled),
            Side::Sell => self.sells.get(px_scaled),
        }?;
        level.iter().find(|n| n.order.order_id == order_id).map(|n| n.order)
    }

    /// Inserts a brand-new order (not already in the directory) onto its
    /// side, updating top-of-book bookkeeping if it created a new best
    /// level. Used both by `add` and by `modify`'s reprice/unknown-id paths.
    fn insert_fresh(&mut self, order: Order) -> Result<(), EngineFault> {
        let seq = self.allocate_seq();
        let became_new_top_level = match order.side {
            Side::Buy => {
                let (level, _) = self.buys.add(order.px_scaled, &mut self.pool)?;
                level.push_back(order, seq);
                let level_len = level.len();
                level_len == 1 && self.buys.top_price() == Some(order.px_scaled)
            }
            Side::Sell => {
                let (level, _) = self.sells.add(order.px_scaled, &mut self.pool)?;
                level.push_back(order, seq);
                let level_len = level.len();
                level_len == 1 && self.sells.top_price() == Some(order.px_scaled)
            }
        };
        self.directory.insert(
            order.order_id,
            OrderLocation {
                side: order.side,
                px_scaled: order.px_scaled,
            },
        );
        if became_new_top_level {
            self.expected_trades.clear();
            self.expecting_trades = self.is_crossed();
        }
        trace!(
            order_id = order.order_id,
            side = %order.side,
            qty = order.qty,
            px = order.px_scaled,
            "order inserted"
        );
        Ok(())
    }

    /// Removes a live order from its side's index. `mid` is derived from
    /// the current tops rather than cached, so a top-of-book removal needs
    /// no further bookkeeping here; per spec §4.2, the expected-trade
    /// buffer is deliberately left untouched by a removal (only an
    /// insertion that creates a new top level re-arms it — see
    /// `insert_fresh`). Assumes `order_id` is already known to be present
    /// on `side` at `px_scaled` (the caller validates the feed-level
    /// anomaly classification before calling this).
    fn remove_internal(&mut self, order_id: u32, side: Side, px_scaled: PriceScaled) -> Result<(), EngineFault> {
        match side {
            Side::Buy => {
                let level = self
                    .buys
                    .get_mut(px_scaled)
                    .ok_or(EngineFault::DanglingDirectoryEntry { order_id })?;
                if level.remove(order_id).is_none() {
                    return Err(EngineFault::DanglingDirectoryEntry { order_id });
                }
                if level.is_empty() {
                    self.buys.remove(px_scaled, &mut self.pool);
                }
            }
            Side::Sell => {
                let level = self
                    .sells
                    .get_mut(px_scaled)
                    .ok_or(EngineFault::DanglingDirectoryEntry { order_id })?;
                if level.remove(order_id).is_none() {
                    return Err(EngineFault::DanglingDirectoryEntry { order_id });
                }
                if level.is_empty() {
                    self.sells.remove(px_scaled, &mut self.pool);
                }
            }
        }
        Ok(())
    }

    /// Inserts a new resting order. Returns `false` (and counts
    /// `duplicate_order_id`) if `order.order_id` is already live.
    pub fn add(&mut self, order: Order) -> bool {
        self.order_arrival_precheck();
        if self.directory.contains_key(&order.order_id) {
            self.errors.duplicate_order_id += 1;
            warn!(order_id = order.order_id, "duplicate order id on add");
            return false;
        }
        match self.insert_fresh(order) {
            Ok(()) => true,
            Err(fault) => {
                tracing::error!(%fault, "internal invariant violation during add");
                self.errors.unexpected_exception += 1;
                false
            }
        }
    }

    /// Removes a live order. `side` and `px_scaled` must match the order's
    /// recorded location exactly, or the removal is rejected as
    /// `remove_without_match` (spec §4.2) — `qty` is accepted but not
    /// checked, matching the source.
    pub fn remove(&mut self, order_id: u32, side: Side, _qty: u32, px_scaled: PriceScaled) -> bool {
        self.order_arrival_precheck();
        let Some(loc) = self.directory.get(&order_id).copied() else {
            self.errors.remove_without_match += 1;
            return false;
        };
        if loc.side != side || loc.px_scaled != px_scaled {
            self.errors.remove_without_match += 1;
            return false;
        }
        match self.remove_internal(order_id, side, px_scaled) {
            Ok(()) => {
                self.directory.remove(&order_id);
                true
            }
            Err(fault) => {
                tracing::error!(%fault, "internal invariant violation during remove");
                self.errors.unexpected_exception += 1;
                false
            }
        }
    }

    /// Modifies a live order's quantity and/or price.
    ///
    /// - Unknown id: treated as a fresh insert (counted as
    ///   `modify_without_order`, not blocked).
    /// - Known id, wrong side: rejected (`modify_wrong_side`), no mutation.
    /// - Known id, same side, quantity increased or price changed: loses
    ///   time priority (removed and reinserted at the back of its new
    ///   level).
    /// - Known id, same side, quantity decreased (or unchanged) at the same
    ///   price: mutated in place, preserving time priority.
    pub fn modify(&mut self, order_id: u32, side: Side, qty: u32, px_scaled: PriceScaled) {
        self.order_arrival_precheck();
        let loc = match self.directory.get(&order_id).copied() {
            None => {
                match self.insert_fresh(Order::new(order_id, side, qty, px_scaled)) {
                    Ok(()) => self.errors.modify_without_order += 1,
                    Err(fault) => {
                        tracing::error!(%fault, "internal invariant violation during modify-as-insert");
                        self.errors.unexpected_exception += 1;
                    }
                }
                return;
            }
            Some(loc) => loc,
        };
        if loc.side != side {
            self.errors.modify_wrong_side += 1;
            return;
        }
        if let Err(fault) = self.modify_internal(order_id, loc, qty, px_scaled) {
            tracing::error!(%fault, "internal invariant violation during modify");
            self.errors.unexpected_exception += 1;
        }
    }

    fn modify_internal(
        &mut self,
        order_id: u32,
        loc: OrderLocation,
        qty: u32,
        px_scaled: PriceScaled,
    ) -> Result<(), EngineFault> {
        let existing = self
            .get_order(loc.side, loc.px_scaled, order_id)
            .ok_or(EngineFault::DanglingDirectoryEntry { order_id })?;

        if qty > existing.qty || px_scaled != existing.px_scaled {
            self.remove_internal(order_id, loc.side, loc.px_scaled)?;
            self.insert_fresh(Order::new(order_id, loc.side, qty, px_scaled))?;
        } else {
            let level = match loc.side {
                Side::Buy => self.buys.get_mut(loc.px_scaled),
                Side::Sell => self.sells.get_mut(loc.px_scaled),
            }
            .ok_or(EngineFault::DanglingDirectoryEntry { order_id })?;
            if !level.set_qty(order_id, qty) {
                return Err(EngineFault::DanglingDirectoryEntry { order_id });
            }
        }
        Ok(())
    }

    /// Records a trade report. Always updates the running [`TradeAggregate`]
    /// and returns its `(run_count, px_scaled)` pair for display, regardless
    /// of classification — only the error counters distinguish an expected
    /// trade from an unexpected one.
    pub fn handle_trade(&mut self, qty: u32, px_scaled: PriceScaled) -> (u32, PriceScaled) {
        let emitted = self.trade_aggregate.record(qty, px_scaled);

        if !self.is_crossed() {
            self.errors.trade_without_match += 1;
            warn!(qty, px = px_scaled, "trade reported on an uncrossed book");
            return emitted;
        }

        if self.expected_trades.is_empty() {
            if self.expecting_trades {
                let projected = project_expected_trades(&self.buys, &self.sells);
                self.expected_trades = projected.into_iter().collect();
                self.expecting_trades = false;
            } else {
                self.errors.trade_without_match += 1;
                warn!(qty, px = px_scaled, "trade reported with no outstanding cross");
                return emitted;
            }
        }

        match self.expected_trades.front().copied() {
            Some((expected_qty, expected_px)) if expected_qty == qty && expected_px == px_scaled => {
                self.expected_trades.pop_front();
            }
            _ => {
                self.errors.trade_without_match += 1;
                warn!(qty, px = px_scaled, "trade report did not match the expected-trade vector");
            }
        }
        emitted
    }
}
