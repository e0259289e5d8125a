//! Product line parsers.
//!
//! Two strategies produce identical records for well-formed lines:
//! - [`TokenScanParser`] splits on whitespace and reads prices backward from
//!   the end of the line. It tolerates irregular spacing and punctuation in
//!   descriptions and is the default.
//! - [`RegexLineParser`] matches the whole line against one pattern with a
//!   group per field.

use crate::models::config::{ParseStrategy, ParserConfig};
use crate::models::product::{PriceColumn, ProductRecord, DEFAULT_PRICE_COLUMNS};

use super::rules::{
    assign_prices, clean_description, has_low_stock_marker, is_price_token,
    strip_trailing_numbers, PRODUCT_CODE, PRODUCT_LINE,
};

/// Number of trailing price columns on a product line.
pub const PRICE_COUNT: usize = 4;

/// Code, at least one description token and the prices.
pub const MIN_TOKENS: usize = PRICE_COUNT + 2;

/// Trait for turning a product candidate line into a record.
pub trait ProductLineParser {
    /// Parse a line, or `None` when it does not fit the product schema.
    fn parse_line(&self, line: &str, category: &str) -> Option<ProductRecord>;
}

/// How recovered fields become a record.
#[derive(Debug, Clone)]
pub struct LineSchema {
    /// Field written by each trailing price token, left to right.
    pub price_columns: [PriceColumn; 4],
    /// Extension of the derived image reference.
    pub image_extension: String,
    /// Drop stray trailing numbers from cleaned descriptions.
    pub strip_trailing_numbers: bool,
}

impl Default for LineSchema {
    fn default() -> Self {
        Self {
            price_columns: DEFAULT_PRICE_COLUMNS,
            image_extension: "jpg".to_string(),
            strip_trailing_numbers: false,
        }
    }
}

impl LineSchema {
    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            price_columns: config.price_columns,
            image_extension: config.image_extension.clone(),
            strip_trailing_numbers: config.strip_trailing_numbers,
        }
    }

    /// Assemble a record from raw fields.
    ///
    /// The low-stock flag is read from the raw description since cleanup
    /// removes the markers.
    pub fn build(
        &self,
        code: &str,
        raw_description: &str,
        prices: &[&str; PRICE_COUNT],
        category: &str,
    ) -> ProductRecord {
        let is_low_stock = has_low_stock_marker(raw_description);

        let mut description = clean_description(raw_description);
        if self.strip_trailing_numbers {
            description = strip_trailing_numbers(&description);
        }

        let mut record = ProductRecord::new(code, description, category, &self.image_extension);
        assign_prices(&mut record, prices, &self.price_columns);
        record.is_low_stock = is_low_stock;
        record
    }
}

/// Whitespace tokenizer with a backward price scan.
#[derive(Debug, Clone)]
pub struct TokenScanParser {
    min_tokens: usize,
    schema: LineSchema,
}

impl TokenScanParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            min_tokens: MIN_TOKENS,
            schema: LineSchema::default(),
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            min_tokens: config.min_tokens.max(MIN_TOKENS),
            schema: LineSchema::from_config(config),
        }
    }

    /// Set the price column mapping.
    pub fn with_price_columns(mut self, columns: [PriceColumn; 4]) -> Self {
        self.schema.price_columns = columns;
        self
    }

    /// Set the image reference extension.
    pub fn with_image_extension(mut self, extension: impl Into<String>) -> Self {
        self.schema.image_extension = extension.into();
        self
    }

    /// Strip trailing numbers from descriptions.
    pub fn with_trailing_number_stripping(mut self, enabled: bool) -> Self {
        self.schema.strip_trailing_numbers = enabled;
        self
    }
}

impl Default for TokenScanParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductLineParser for TokenScanParser {
    fn parse_line(&self, line: &str, category: &str) -> Option<ProductRecord> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < self.min_tokens {
            return None;
        }

        let code = tokens[0];
        if !PRODUCT_CODE.is_match(code) {
            return None;
        }

        let first_price = trailing_prices_start(&tokens)?;
        if first_price < 2 {
            return None;
        }
        let prices = <&[&str; PRICE_COUNT]>::try_from(&tokens[first_price..]).ok()?;
        let raw_description = tokens[1..first_price].join(" ");

        Some(self.schema.build(code, &raw_description, prices, category))
    }
}

/// Index of the first of the last four tokens, if all four look like prices.
///
/// Scanning stops at the first non-price token from the end and never
/// reaches the code at index 0.
fn trailing_prices_start(tokens: &[&str]) -> Option<usize> {
    let mut found = 0;
    for i in (1..tokens.len()).rev() {
        if !is_price_token(tokens[i]) {
            return None;
        }
        found += 1;
        if found == PRICE_COUNT {
            return Some(i);
        }
    }
    None
}

/// Full-line regular expression parser.
#[derive(Debug, Clone, Default)]
pub struct RegexLineParser {
    schema: LineSchema,
}

impl RegexLineParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            schema: LineSchema::from_config(config),
        }
    }

    /// Set the price column mapping.
    pub fn with_price_columns(mut self, columns: [PriceColumn; 4]) -> Self {
        self.schema.price_columns = columns;
        self
    }
}

impl ProductLineParser for RegexLineParser {
    fn parse_line(&self, line: &str, category: &str) -> Option<ProductRecord> {
        let caps = PRODUCT_LINE.captures(line.trim())?;
        let prices = [&caps[3], &caps[4], &caps[5], &caps[6]];
        Some(self.schema.build(&caps[1], &caps[2], &prices, category))
    }
}

/// Build the line parser selected in configuration.
pub fn parser_for(config: &ParserConfig) -> Box<dyn ProductLineParser + Send + Sync> {
    match config.strategy {
        ParseStrategy::Token => Box::new(TokenScanParser::from_config(config)),
        ParseStrategy::Regex => Box::new(RegexLineParser::from_config(config)),
    }
}
