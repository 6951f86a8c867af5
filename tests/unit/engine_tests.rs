//! End-to-end scenarios and invariant checks for the book engine.

use lob_feed_engine::prelude::*;

fn scaled(px: f64) -> u32 {
    (px * f64::from(SCALE)).round() as u32
}

fn add(book: &mut OrderBook, id: u32, side: Side, qty: u32, px: f64) {
    assert!(book.add(Order::new(id, side, qty, scaled(px))));
}

#[test]
fn scenario_1_three_sell_levels_shift_mid_each_time_one_becomes_top() {
    let mut book = OrderBook::new();
    add(&mut book, 1, Side::Buy, 1, 1000.0);
    assert_eq!(book.mid(), None);
    add(&mut book, 2, Side::Sell, 1, 1010.0);
    assert_eq!(book.mid(), Some(1005.0));
    add(&mut book, 3, Side::Sell, 1, 1020.0);
    assert_eq!(book.mid(), Some(1005.0));
    add(&mut book, 4, Side::Sell, 1, 1005.0);
    assert_eq!(book.mid(), Some(1002.5));
    assert!(book.errors().is_empty());
}

#[test]
fn scenario_2_modify_reprices_even_when_quantity_only_grows_at_same_price() {
    let mut book = OrderBook::new();
    add(&mut book, 1, Side::Buy, 1, 1000.0);
    add(&mut book, 2, Side::Sell, 1, 1010.0);

    book.modify(2, Side::Sell, 1, scaled(1020.0));
    assert_eq!(book.mid(), Some(1010.0));

    book.modify(2, Side::Sell, 1000, scaled(1020.0));
    assert_eq!(book.mid(), Some(1010.0));

    assert!(book.errors().is_empty());
    let level = book.sells().get(scaled(1020.0)).unwrap();
    assert_eq!(level.len(), 1);
    assert_eq!(level.front().unwrap().order.qty, 1000);
}

#[test]
fn scenario_3_modify_of_unknown_id_inserts_and_counts_anomaly() {
    let mut book = OrderBook::new();
    book.modify(2, Side::Sell, 1000, scaled(1020.0));
    assert_eq!(book.mid(), None);
    assert_eq!(book.errors().modify_without_order, 1);
    let level = book.sells().get(scaled(1020.0)).unwrap();
    assert_eq!(level.len(), 1);
}

#[test]
fn scenario_4_trade_reports_are_classified_against_the_expected_vector() {
    let mut book = OrderBook::new();
    add(&mut book, 1, Side::Buy, 4, 1010.0);
    add(&mut book, 2, Side::Sell, 1, 1000.0);
    assert!(book.is_crossed());
    assert_eq!(book.mid(), Some(1005.0));

    assert_eq!(book.handle_trade(2, scaled(1010.0)), (2, scaled(1010.0)));
    assert_eq!(book.errors().trade_without_match, 1);

    assert_eq!(book.handle_trade(1, scaled(1015.0)), (1, scaled(1015.0)));
    assert_eq!(book.errors().trade_without_match, 2);

    assert_eq!(book.handle_trade(1, scaled(1010.0)), (1, scaled(1010.0)));
    assert_eq!(book.errors().trade_without_match, 2);

    assert_eq!(book.handle_trade(1, scaled(1010.0)), (2, scaled(1010.0)));
    assert_eq!(book.errors().trade_without_match, 3);
}

#[test]
fn scenario_5_order_arriving_on_a_still_crossed_book_is_flagged_not_blocked() {
    let mut book = OrderBook::new();
    add(&mut book, 1, Side::Buy, 1, 1020.0);
    add(&mut book, 2, Side::Sell, 2, 1010.0);
    assert_eq!(book.mid(), Some(1015.0));
    assert!(book.waiting_for_trades());

    book.modify(2, Side::Sell, 1, scaled(1010.0));
    assert_eq!(book.mid(), Some(1015.0));
    assert_eq!(book.errors().no_trades_when_expected, 1);
    let level = book.sells().get(scaled(1010.0)).unwrap();
    assert_eq!(level.front().unwrap().order.qty, 1);
}

#[test]
fn scenario_6_reprice_loses_priority_and_wrong_price_remove_is_rejected() {
    let mut book = OrderBook::new();
    add(&mut book, 90, Side::Sell, 1, 110.0);
    add(&mut book, 100, Side::Buy, 1, 100.0);
    assert_eq!(book.mid(), Some(105.0));
    add(&mut book, 101, Side::Buy, 1, 101.0);
    assert_eq!(book.mid(), Some(105.5));
    add(&mut book, 102, Side::Buy, 1, 102.0);
    assert_eq!(book.mid(), Some(106.0));

    book.modify(101, Side::Buy, 1, scaled(108.0));
    assert_eq!(book.mid(), Some(109.0));

    assert!(!book.remove(101, Side::Buy, 1, scaled(101.0)));
    assert_eq!(book.errors().remove_without_match, 1);

    assert!(book.remove(101, Side::Buy, 1, scaled(108.0)));
    assert_eq!(book.mid(), Some(106.0));
}

#[test]
fn remove_after_add_is_identity() {
    let mut book = OrderBook::new();
    add(&mut book, 1, Side::Buy, 10, 1000.0);
    let mid_before = book.mid();
    add(&mut book, 2, Side::Buy, 5, 1000.5);
    book.remove(2, Side::Buy, 5, scaled(1000.5));
    assert_eq!(book.mid(), mid_before);
    assert!(!book.contains_order(2));
}

#[test]
fn quantity_down_preserves_priority_law() {
    let mut book = OrderBook::new();
    add(&mut book, 1, Side::Buy, 10, 1000.0);
    add(&mut book, 2, Side::Buy, 10, 1000.0);
    add(&mut book, 3, Side::Buy, 10, 1000.0);
    book.modify(2, Side::Buy, 4, scaled(1000.0));
    let ids: Vec<u32> = book
        .buys()
        .get(scaled(1000.0))
        .unwrap()
        .iter()
        .map(|n| n.order.order_id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn price_change_loses_priority_law() {
    let mut book = OrderBook::new();
    add(&mut book, 1, Side::Buy, 10, 1000.0);
    add(&mut book, 2, Side::Buy, 10, 1000.0);
    book.modify(1, Side::Buy, 10, scaled(1000.0) + 1);
    let ids: Vec<u32> = book
        .buys()
        .get(scaled(1000.0) + 1)
        .unwrap()
        .iter()
        .map(|n| n.order.order_id)
        .collect();
    assert_eq!(ids, vec![1]);
    assert!(book.buys().get(scaled(1000.0)).unwrap().iter().any(|n| n.order.order_id == 2));
}

#[test]
fn side_index_key_sets_stay_in_sync_across_a_mixed_sequence() {
    let mut book = OrderBook::new();
    add(&mut book, 1, Side::Buy, 10, 1000.0);
    add(&mut book, 2, Side::Buy, 5, 1001.0);
    add(&mut book, 3, Side::Sell, 3, 1010.0);
    book.modify(1, Side::Buy, 10, scaled(1002.0));
    book.remove(2, Side::Buy, 5, scaled(1001.0));
    assert!(book.buys().check_invariants());
    assert!(book.sells().check_invariants());
}
