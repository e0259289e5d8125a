//! Core library for price-list product extraction.
//!
//! This crate provides:
//! - Line classification into category headers, product candidates and noise
//! - Product line parsing (token scan and full-line regex strategies)
//! - Product records with a fixed tabular column contract
//! - PDF text extraction feeding the line parser (`pdf` feature)

pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod pricelist;

pub use error::{PriceListError, Result};
pub use models::config::PriceListConfig;
pub use models::product::{PriceColumn, ProductRecord, DEFAULT_PRICE_COLUMNS};
pub use models::summary::CatalogSummary;
#[cfg(feature = "pdf")]
pub use pdf::{PdfExtractor, PdfProcessor};
pub use pricelist::{
    CategoryState, ExtractionResult, LineClassifier, LineKind, PriceListExtractor,
    ProductLineParser, RegexLineParser, TokenScanParser,
};
