//! Demonstrates a crossed book: the expected-trade vector it produces, and
//! how trade reports are matched against it one at a time.

use lob_feed_engine::orderbook::engine::OrderBook;
use lob_feed_engine::orderbook::order::{Order, Side};

fn main() {
    tracing_subscriber::fmt::init();

    let mut book = OrderBook::new();
    book.add(Order::new(1, Side::Buy, 4, 1_010_000));
    book.add(Order::new(2, Side::Sell, 1, 1_000_000));

    println!("crossed: {}", book.is_crossed());
    println!("waiting for trades: {}", book.waiting_for_trades());

    for (qty, px_scaled) in [(2, 1_010_000), (1, 1_015_000), (1, 1_010_000), (1, 1_010_000)] {
        let (run_count, px) = book.handle_trade(qty, px_scaled);
        println!("reported {qty}@{px_scaled} -> aggregate {run_count}@{px}");
    }

    println!("{}", book.errors());
}
