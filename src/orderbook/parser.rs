//! Line parser (C6, spec §4.6): turns one textual feed line into a typed
//! message or a classification. Structural failures (wrong field count, an
//! unrecognized action letter, a blank line) are [`ParseError::Corrupted`];
//! a line with the right shape but invalid field content is
//! [`ParseError::OutOfBounds`]. Never panics on malformed input — every
//! failure path returns a classification, matching spec §7's "parsers
//! surface failures by classification tag, never by exception-style
//! propagation."

use std::fmt;

use super::order::Side;
use super::price::{self, PriceScaled};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Add,
    Remove,
    Modify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedMessage {
    Order {
        action: OrderAction,
        id: u32,
        side: Side,
        qty: u32,
        px_scaled: PriceScaled,
    },
    Trade {
        qty: u32,
        px_scaled: PriceScaled,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Missing separators, an unrecognized action letter, or a blank line.
    Corrupted,
    /// The right shape, but a field violates a numeric or enum constraint.
    OutOfBounds,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseError::Corrupted => "corrupted",
            ParseError::OutOfBounds => "out of bounds",
        })
    }
}

/// Trims the comment tail the grammar tolerates after the *price* token:
/// the first ` `, `/`, or `\r` byte in `field` and everything after it.
/// Only the price field may carry this tail, so callers must apply this to
/// the last comma-separated field alone — never to the whole line before
/// tokenizing, or a stray space in an earlier field (e.g. a malformed side
/// letter) would be silently swallowed into the wrong field.
fn strip_comment_tail(field: &str) -> &str {
    let end = field.find([' ', '/', '\r']).unwrap_or(field.len());
    &field[..end]
}

fn parse_u32_strict(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_side(s: &str) -> Option<Side> {
    match s {
        "B" => Some(Side::Buy),
        "S" => Some(Side::Sell),
        _ => None,
    }
}

/// Parses one line (without its trailing newline) into a typed message.
pub fn parse_line(line: &str) -> Result<ParsedMessage, ParseError> {
    if line.is_empty() {
        return Err(ParseError::Corrupted);
    }
    let mut fields: Vec<&str> = line.split(',').collect();
    if let Some(last) = fields.last_mut() {
        *last = strip_comment_tail(last);
    }

    match fields.first().copied() {
        Some("A") | Some("X") | Some("M") => {
            let [action_str, id_str, side_str, qty_str, px_str] = fields[..] else {
                return Err(ParseError::Corrupted);
            };
            let action = match action_str {
                "A" => OrderAction::Add,
                "X" => OrderAction::Remove,
                "M" => OrderAction::Modify,
                _ => unreachable!("matched above"),
            };
            let id = parse_u32_strict(id_str).ok_or(ParseError::OutOfBounds)?;
            let side = parse_side(side_str).ok_or(ParseError::OutOfBounds)?;
            let qty = parse_u32_strict(qty_str).ok_or(ParseError::OutOfBounds)?;
            if qty == 0 {
                return Err(ParseError::OutOfBounds);
            }
            let px_scaled = price::parse_decimal_scaled(px_str).ok_or(ParseError::OutOfBounds)?;
            if px_scaled == 0 {
                return Err(ParseError::OutOfBounds);
            }
            Ok(ParsedMessage::Order {
                action,
                id,
                side,
                qty,
                px_scaled,
            })
        }
        Some("T") => {
            let [_, qty_str, px_str] = fields[..] else {
                return Err(ParseError::Corrupted);
            };
            let qty = parse_u32_strict(qty_str).ok_or(ParseError::OutOfBounds)?;
            let px_scaled = price::parse_decimal_scaled(px_str).ok_or(ParseError::OutOfBounds)?;
            Ok(ParsedMessage::Trade { qty, px_scaled })
        }
        _ => Err(ParseError::Corrupted),
    }
}
