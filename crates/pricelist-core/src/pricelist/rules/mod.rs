//! Named predicates and normalizers used by the line parsers.

pub mod description;
pub mod patterns;
pub mod prices;

pub use description::{clean_description, has_low_stock_marker, strip_trailing_numbers};
pub use prices::{assign_prices, is_price_token, parse_price, try_parse_price};
pub use patterns::*;
