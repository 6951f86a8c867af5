//! Expected-trade projection (spec §4.4): the deterministic vector of
//! trades that must follow a newly-entered cross.
//!
//! Computed once per cross episode (triggered the first time a trade is
//! reported while `expecting_trades` is set), consumed front-to-back as
//! trade reports arrive, and compared for strict equality against each
//! incoming report.

use super::order::Side;
use super::side::{BuySide, SellSide};

/// Computes the expected-trade vector for a crossed book.
///
/// Defines the aggressor as the top-of-book order, on either side, with
/// the larger arrival sequence (i.e. whichever one crossed the book just
/// now). Starting from the top of the *opposite* side, walks levels in
/// that side's own best-first order; within each level, walks the FIFO
/// queue. A level is visited only while it still satisfies the aggressor's
/// matching predicate (buy aggressor: level price <= aggressor price; sell
/// aggressor: level price >= aggressor price) — since levels are visited in
/// sorted order, the first level that fails the predicate ends the walk
/// entirely.
///
/// Callers must ensure the book is actually crossed (both sides non-empty,
/// best bid >= best ask) before calling this.
#[must_use]
pub fn project_expected_trades(buys: &BuySide, sells: &SellSide) -> Vec<(u32, u32)> {
    let (buy_price, buy_level) = buys.top().expect("project_expected_trades: empty buy side");
    let (sell_price, sell_level) = sells.top().expect("project_expected_trades: empty sell side");
    let buy_node = buy_level.front().expect("side index invariant: level non-empty");
    let sell_node = sell_level.front().expect("side index invariant: level non-empty");

    let aggressor_side = if buy_node.seq > sell_node.seq {
        Side::Buy
    } else {
        Side::Sell
    };

    let mut trades = Vec::new();
    match aggressor_side {
        Side::Buy => {
            let mut volume_to_go = buy_node.order.qty;
            for (level_price, level) in sells.iter_in_price_order() {
                if volume_to_go == 0 || level_price > buy_price {
                    break;
                }
                for node in level.iter() {
                    if volume_to_go == 0 {
                        break;
                    }
                    let qty = volume_to_go.min(node.order.qty);
                    trades.push((qty, level_price));
                    volume_to_go -= qty;
                }
            }
        }
        Side::Sell => {
            let mut volume_to_go = sell_node.order.qty;
            for (level_price, level) in buys.iter_in_price_order() {
                if volume_to_go == 0 || level_price < sell_price {
                    break;
                }
                for node in level.iter() {
                    if volume_to_go == 0 {
                        break;
                    }
                    let qty = volume_to_go.min(node.order.qty);
                    trades.push((qty, level_price));
                    volume_to_go -= qty;
                }
            }
        }
    }
    trades
}
