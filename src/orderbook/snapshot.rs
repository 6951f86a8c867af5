//! Book snapshot rendering (spec §4.7): a full dump of both sides, used by
//! the driver on its periodic cadence and once at end of stream.

use std::fmt::Write as _;

use super::engine::OrderBook;
use super::order::Side;
use super::price::{format_significant, SCALE};

const PRICE_SIGNIFICANT_DIGITS: i32 = 8;

fn unscale(px_scaled: u32) -> f64 {
    f64::from(px_scaled) / f64::from(SCALE)
}

/// Renders `Buys:`/`Sells:` sections, each order as
/// `{id}: {Buy|Sell} {qty} @ {px}`, best price first within each section.
#[must_use]
pub fn render(book: &OrderBook) -> String {
    let mut out = String::new();
    writeln!(out, "Buys:").expect("writing to a String cannot fail");
    for (_, level) in book.buys().iter_in_price_order() {
        for node in level.iter() {
            render_order_line(&mut out, node.order.order_id, Side::Buy, node.order.qty, node.order.px_scaled);
        }
    }
    writeln!(out, "Sells:").expect("writing to a String cannot fail");
    for (_, level) in book.sells().iter_in_price_order() {
        for node in level.iter() {
            render_order_line(&mut out, node.order.order_id, Side::Sell, node.order.qty, node.order.px_scaled);
        }
    }
    out
}

fn render_order_line(out: &mut String, id: u32, side: Side, qty: u32, px_scaled: u32) {
    let px = format_significant(unscale(px_scaled), PRICE_SIGNIFICANT_DIGITS);
    writeln!(out, "{id}: {side} {qty} @ {px}").expect("writing to a String cannot fail");
}
