//! Demonstrates replaying a small hand-written feed against an
//! [`OrderBook`] directly, without going through the CLI driver or parser.

use lob_feed_engine::orderbook::engine::OrderBook;
use lob_feed_engine::orderbook::order::{Order, Side};

fn main() {
    tracing_subscriber::fmt::init();

    let mut book = OrderBook::new();

    book.add(Order::new(1, Side::Buy, 10, 1_000_000));
    book.add(Order::new(2, Side::Sell, 5, 1_010_000));
    println!("mid after two resting orders: {:?}", book.mid());

    book.modify(2, Side::Sell, 5, 1_005_000);
    println!("mid after repricing the ask down: {:?}", book.mid());

    book.remove(1, Side::Buy, 10, 1_000_000);
    println!("mid after removing the only bid: {:?}", book.mid());

    println!("{}", book.errors());
}
