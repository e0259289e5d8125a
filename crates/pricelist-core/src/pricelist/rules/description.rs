//! Description cleanup and marker detection.

use super::patterns::{
    DESCRIPTION_MARKERS, LOW_STOCK_MARKER, PARENTHESIZED, TRAILING_DECIMAL,
    TRAILING_LONG_INTEGER, TRAILING_PAREN_NUMBER, WHITESPACE_RUN,
};

/// Strip condition markers and parenthesized notes, then normalize spacing.
///
/// Marker removal runs before parentheses so that a marker inside a note
/// does not split it.
pub fn clean_description(raw: &str) -> String {
    let without_markers = DESCRIPTION_MARKERS.replace_all(raw, "");
    let without_notes = PARENTHESIZED.replace_all(&without_markers, "");
    collapse_whitespace(&without_notes)
}

/// Whether a raw (uncleaned) description carries a low-stock marker.
pub fn has_low_stock_marker(raw: &str) -> bool {
    LOW_STOCK_MARKER.is_match(raw)
}

/// Remove numbers that bled into the end of a description from a
/// neighbouring column: a decimal, then a 4+ digit integer, then a
/// parenthesized integer.
pub fn strip_trailing_numbers(description: &str) -> String {
    let s = TRAILING_DECIMAL.replace(description, "");
    let s = TRAILING_LONG_INTEGER.replace(&s, "");
    let s = TRAILING_PAREN_NUMBER.replace(&s, "");
    collapse_whitespace(&s)
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s, " ").trim().to_string()
}
