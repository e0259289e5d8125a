//! Price-list line classification and product extraction.

mod classifier;
mod extractor;
mod parser;
pub mod rules;

pub use classifier::{is_product_candidate, is_upper_shape, CategoryState, LineClassifier, LineKind};
pub use extractor::{ExtractionResult, ExtractionStats, LineOutcome, PriceListExtractor};
pub use parser::{
    parser_for, LineSchema, ProductLineParser, RegexLineParser, TokenScanParser, MIN_TOKENS,
    PRICE_COUNT,
};
