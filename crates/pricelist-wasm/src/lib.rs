//! WASM bindings for price-list product extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Text has to be extracted from the document beforehand; PDF support is not
//! compiled in.

use wasm_bindgen::prelude::*;

use pricelist_core::models::config::{ParseStrategy, PriceListConfig};
use pricelist_core::pricelist::{parser_for, rules};
use pricelist_core::{CatalogSummary, CategoryState, LineClassifier, PriceListExtractor};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract products from price-list text with the default settings.
///
/// Returns `{ products, categories, stats }`.
#[wasm_bindgen]
pub fn extract_products_from_text(text: &str) -> Result<JsValue, JsValue> {
    let result = PriceListExtractor::new().extract_text(text);
    to_js(&result)
}

/// Parse a single product line under the given category.
///
/// Returns `undefined` when the line does not fit the product layout.
#[wasm_bindgen]
pub fn parse_product_line(line: &str, category: &str) -> Result<JsValue, JsValue> {
    let parser = parser_for(&PriceListConfig::default().parser);
    match parser.parse_line(line.trim(), category) {
        Some(record) => to_js(&record),
        None => Ok(JsValue::UNDEFINED),
    }
}

/// Classify a line on its own: "category_header", "product_candidate" or "noise".
#[wasm_bindgen]
pub fn classify_line(line: &str) -> String {
    let mut state = CategoryState::new();
    let kind = LineClassifier::new().classify(line, &mut state);
    serde_json::to_value(kind)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Parse a price token ("1234,5" or "1234.50").
#[wasm_bindgen]
pub fn parse_price(token: &str) -> Option<f64> {
    rules::try_parse_price(token).and_then(|d| d.to_string().parse().ok())
}

/// Price-list parser class for browser use.
#[wasm_bindgen]
pub struct PriceListParser {
    config: PriceListConfig,
    extractor: PriceListExtractor,
}

#[wasm_bindgen]
impl PriceListParser {
    /// Create a parser, optionally from a configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<PriceListParser, JsValue> {
        let config: PriceListConfig = if config.is_undefined() || config.is_null() {
            PriceListConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        Self::from_config(config)
    }

    /// Switch between the "token" and "regex" line parsers.
    #[wasm_bindgen]
    pub fn set_strategy(&mut self, strategy: &str) -> Result<(), JsValue> {
        let strategy = match strategy {
            "token" => ParseStrategy::Token,
            "regex" => ParseStrategy::Regex,
            other => return Err(JsValue::from_str(&format!("unknown strategy: {}", other))),
        };
        let mut config = self.config.clone();
        config.parser.strategy = strategy;
        *self = Self::from_config(config)?;
        Ok(())
    }

    /// Current configuration as a plain object.
    #[wasm_bindgen]
    pub fn config(&self) -> Result<JsValue, JsValue> {
        to_js(&self.config)
    }

    /// Extract products from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.extractor.extract_text(text);
        to_js(&result.products)
    }

    /// Extract products along with categories, line statistics and a summary.
    #[wasm_bindgen]
    pub fn extract_with_summary(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.extractor.extract_text(text);

        #[derive(serde::Serialize)]
        struct ExtractOutput<'a> {
            products: &'a [pricelist_core::ProductRecord],
            categories: &'a [String],
            stats: &'a pricelist_core::pricelist::ExtractionStats,
            summary: CatalogSummary,
        }

        let output = ExtractOutput {
            products: &result.products,
            categories: &result.categories,
            stats: &result.stats,
            summary: CatalogSummary::from_products(&result.products),
        };

        to_js(&output)
    }
}

impl PriceListParser {
    fn from_config(config: PriceListConfig) -> Result<PriceListParser, JsValue> {
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let extractor = PriceListExtractor::from_config(&config);
        Ok(Self { config, extractor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_classify_line() {
        assert_eq!(classify_line("CUBIERTOS"), "category_header");
        assert_eq!(classify_line("1001 TENEDOR 10 20 30 40"), "product_candidate");
        assert_eq!(classify_line("Página 1"), "noise");
    }

    #[wasm_bindgen_test]
    fn test_parse_price() {
        let price = parse_price("1234,5").unwrap();
        assert!((price - 1234.5).abs() < 0.001);
        assert!(parse_price("abc").is_none());
    }

    #[wasm_bindgen_test]
    fn test_parse_product_line_rejects_short_line() {
        assert!(parse_product_line("1001 TENEDOR 10", "CUBIERTOS")
            .unwrap()
            .is_undefined());
    }
}
