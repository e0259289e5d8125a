//! Price token recognition and normalization.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::PRICE_TOKEN;
use crate::models::product::{PriceColumn, ProductRecord};

/// Whether a whitespace token looks like a price amount.
pub fn is_price_token(token: &str) -> bool {
    PRICE_TOKEN.is_match(token)
}

/// Parse a price with either a comma or a period as decimal separator.
///
/// Interior spaces are dropped. Returns `None` if the result is not a
/// number.
pub fn try_parse_price(s: &str) -> Option<Decimal> {
    let normalized: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    Decimal::from_str(&normalized).ok()
}

/// Parse a price, falling back to zero for unreadable input.
pub fn parse_price(s: &str) -> Decimal {
    try_parse_price(s).unwrap_or(Decimal::ZERO)
}

/// Write four positional price tokens into a record through a column mapping.
pub fn assign_prices(record: &mut ProductRecord, tokens: &[&str; 4], columns: &[PriceColumn; 4]) {
    for (token, column) in tokens.iter().zip(columns) {
        record.set_price(*column, parse_price(token));
    }
}
