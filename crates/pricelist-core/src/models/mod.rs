//! Data models: products, summaries and configuration.

pub mod config;
pub mod product;
pub mod summary;

pub use config::PriceListConfig;
pub use product::{PriceColumn, ProductRecord, DEFAULT_PRICE_COLUMNS};
pub use summary::CatalogSummary;
