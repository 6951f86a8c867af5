//! Grammar and classification tests for the line parser, exercised through
//! the crate's public API rather than `parser`'s own inline unit tests.

use lob_feed_engine::prelude::*;

#[test]
fn add_remove_modify_and_trade_all_parse() {
    assert!(matches!(
        parse_line("A,1,B,10,1000"),
        Ok(ParsedMessage::Order { action: OrderAction::Add, id: 1, side: Side::Buy, qty: 10, .. })
    ));
    assert!(matches!(
        parse_line("X,1,S,10,1000"),
        Ok(ParsedMessage::Order { action: OrderAction::Remove, side: Side::Sell, .. })
    ));
    assert!(matches!(
        parse_line("M,1,B,10,1000"),
        Ok(ParsedMessage::Order { action: OrderAction::Modify, .. })
    ));
    assert!(matches!(parse_line("T,5,1000"), Ok(ParsedMessage::Trade { qty: 5, .. })));
}

#[test]
fn fractional_price_is_scaled_and_truncated() {
    let msg = parse_line("A,1,B,1,1.2345678").unwrap();
    match msg {
        ParsedMessage::Order { px_scaled, .. } => assert_eq!(px_scaled, 1_234), // truncated to SCALE's precision
        _ => panic!("expected an order"),
    }
}

#[test]
fn price_overflowing_u32_after_scaling_is_out_of_bounds() {
    assert_eq!(parse_line("A,1,B,1,5000000000"), Err(ParseError::OutOfBounds));
}

#[test]
fn dos_line_endings_and_trailing_comments_are_tolerated() {
    assert_eq!(parse_line("A,1,B,10,1000\r\n".trim_end_matches('\n')), parse_line("A,1,B,10,1000"));
    assert_eq!(parse_line("A,1,B,10,1000 // note"), parse_line("A,1,B,10,1000"));
}

#[test]
fn every_field_count_mismatch_is_corrupted_not_out_of_bounds() {
    assert_eq!(parse_line("A,1,B,10,1000,extra"), Err(ParseError::Corrupted));
    assert_eq!(parse_line("T,5,1000,extra"), Err(ParseError::Corrupted));
}

#[test]
fn sign_characters_are_never_accepted() {
    assert_eq!(parse_line("A,-1,B,10,1000"), Err(ParseError::OutOfBounds));
    assert_eq!(parse_line("A,1,B,-10,1000"), Err(ParseError::OutOfBounds));
}
