//! Common regex patterns for price-list line parsing.

use lazy_static::lazy_static;
use regex::Regex;

/// Price token body: up to six integer digits, optional 1-2 decimals.
pub const PRICE_BODY: &str = r"[0-9]{1,6}(?:[.,][0-9]{1,2})?";

lazy_static! {
    // A whole token that looks like a price
    pub static ref PRICE_TOKEN: Regex = Regex::new(
        &format!(r"^{}$", PRICE_BODY)
    ).unwrap();

    // Product code at the start of a line
    pub static ref PRODUCT_PREFIX: Regex = Regex::new(
        r"^[0-9]{1,5}\s"
    ).unwrap();

    pub static ref PRODUCT_CODE: Regex = Regex::new(
        r"^[0-9]{1,5}$"
    ).unwrap();

    // Full product line: code, description, four prices
    pub static ref PRODUCT_LINE: Regex = Regex::new(&format!(
        r"^([0-9]{{1,5}})\s+(.+?)\s+({p})\s+({p})\s+({p})\s+({p})$",
        p = PRICE_BODY
    )).unwrap();

    // Special-condition markers embedded in descriptions
    pub static ref DESCRIPTION_MARKERS: Regex = Regex::new(
        r"\*\*|\*|ªª|//"
    ).unwrap();

    pub static ref LOW_STOCK_MARKER: Regex = Regex::new(
        r"\*|ªª"
    ).unwrap();

    pub static ref PARENTHESIZED: Regex = Regex::new(
        r"\([^)]*\)"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();

    // Leftovers from column bleed at the end of descriptions
    pub static ref TRAILING_DECIMAL: Regex = Regex::new(
        r"\s+\d+\.\d+\s*$"
    ).unwrap();

    pub static ref TRAILING_LONG_INTEGER: Regex = Regex::new(
        r"\s+\d{4,}\s*$"
    ).unwrap();

    pub static ref TRAILING_PAREN_NUMBER: Regex = Regex::new(
        r"\s+\(\d+\)\s*$"
    ).unwrap();
}
