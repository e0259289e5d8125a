//! Single-pass extraction over the lines of a price-list document.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::models::config::PriceListConfig;
use crate::models::product::ProductRecord;

use super::classifier::{CategoryState, LineClassifier, LineKind};
use super::parser::{parser_for, ProductLineParser, TokenScanParser};

/// Result of extracting a whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Products in document order.
    pub products: Vec<ProductRecord>,

    /// Category headers in first-seen order.
    pub categories: Vec<String>,

    /// Line counts by outcome.
    pub stats: ExtractionStats,
}

/// Line counts collected during a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Lines read, blank ones included.
    pub total_lines: usize,
    /// Category header lines.
    pub headers: usize,
    /// Lines that looked like products.
    pub candidates: usize,
    /// Candidates that became records.
    pub products: usize,
    /// Candidates discarded as malformed.
    pub rejected: usize,
    /// Lines that were neither headers nor candidates.
    pub noise: usize,
}

/// What happened to one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// A new category is in effect.
    Header(String),
    /// A product was parsed.
    Product(ProductRecord),
    /// A product candidate that did not fit the schema.
    Rejected,
    /// Neither a header nor a candidate.
    Noise,
}

/// Drives the classifier and a line parser over a document.
pub struct PriceListExtractor {
    classifier: LineClassifier,
    parser: Box<dyn ProductLineParser + Send + Sync>,
}

impl PriceListExtractor {
    /// Create an extractor with the default classifier and token-scan parser.
    pub fn new() -> Self {
        Self {
            classifier: LineClassifier::new(),
            parser: Box::new(TokenScanParser::new()),
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &PriceListConfig) -> Self {
        Self {
            classifier: LineClassifier::from_config(&config.classifier),
            parser: parser_for(&config.parser),
        }
    }

    /// Replace the line classifier.
    pub fn with_classifier(mut self, classifier: LineClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the line parser.
    pub fn with_parser(mut self, parser: Box<dyn ProductLineParser + Send + Sync>) -> Self {
        self.parser = parser;
        self
    }

    /// Classify one line and, for product candidates, parse it.
    pub fn process_line(&self, line: &str, state: &mut CategoryState) -> LineOutcome {
        match self.classifier.classify(line, state) {
            LineKind::CategoryHeader => LineOutcome::Header(state.current().to_string()),
            LineKind::ProductCandidate => match self.parser.parse_line(line, state.current()) {
                Some(record) => LineOutcome::Product(record),
                None => LineOutcome::Rejected,
            },
            LineKind::Noise => LineOutcome::Noise,
        }
    }

    /// Extract products from lines in document order.
    pub fn extract_lines<'a, I>(&self, lines: I) -> ExtractionResult
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut state = CategoryState::new();
        let mut result = ExtractionResult::default();

        for line in lines {
            result.stats.total_lines += 1;

            match self.process_line(line, &mut state) {
                LineOutcome::Header(category) => {
                    result.stats.headers += 1;
                    if !result.categories.contains(&category) {
                        debug!("Category found: {}", category);
                        result.categories.push(category);
                    }
                }
                LineOutcome::Product(record) => {
                    result.stats.candidates += 1;
                    result.stats.products += 1;
                    if result.products.is_empty() {
                        debug!(
                            "First product: line={:?} code={} description={:?}",
                            line.trim(),
                            record.code,
                            record.description
                        );
                    }
                    result.products.push(record);
                }
                LineOutcome::Rejected => {
                    result.stats.candidates += 1;
                    result.stats.rejected += 1;
                    trace!("Rejected product line: {:?}", line.trim());
                }
                LineOutcome::Noise => {
                    result.stats.noise += 1;
                }
            }
        }

        info!(
            "Extracted {} products in {} categories from {} lines ({} rejected)",
            result.stats.products,
            result.categories.len(),
            result.stats.total_lines,
            result.stats.rejected
        );

        result
    }

    /// Extract products from newline-separated text.
    pub fn extract_text(&self, text: &str) -> ExtractionResult {
        self.extract_lines(text.lines())
    }
}

impl Default for PriceListExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ParseStrategy;
    use crate::pricelist::parser::RegexLineParser;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
LISTA DE PRECIOS POR RUBRO
TODO PARA LA GASTRONOMIA S.A.
CODIGO
7 SIN RUBRO 1.00 2.00 3.00 4.00
HOUSEWARES
1500 WIDGET DELUXE 10.50 100.00 12.70 121.00
88 SPECIAL ITEM* 5,00 50,00 6,05 60,50
99 X 1 2 3
pagina 1

VAJILLA
1500 WIDGET DELUXE 10.50 100.00 12.70 121.00
201 PLATO (CAJA X 12) 1 2 3 4
HOUSEWARES
300 BALDE 1 2 3 4
";

    #[test]
    fn test_extract_sample() {
        let result = PriceListExtractor::new().extract_text(SAMPLE);

        let codes: Vec<&str> = result.products.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["7", "1500", "88", "1500", "201", "300"]);

        assert_eq!(result.products[0].category, "");
        assert_eq!(result.products[1].category, "HOUSEWARES");
        assert_eq!(result.products[3].category, "VAJILLA");
        assert_eq!(result.products[4].description, "PLATO");
        assert_eq!(result.products[5].category, "HOUSEWARES");

        assert_eq!(result.categories, vec!["HOUSEWARES", "VAJILLA"]);
    }

    #[test]
    fn test_extract_stats() {
        let result = PriceListExtractor::new().extract_text(SAMPLE);

        assert_eq!(
            result.stats,
            ExtractionStats {
                total_lines: 15,
                headers: 3,
                candidates: 7,
                products: 6,
                rejected: 1,
                noise: 5,
            }
        );
    }

    #[test]
    fn test_process_line_outcomes() {
        let extractor = PriceListExtractor::new();
        let mut state = CategoryState::new();

        assert_eq!(
            extractor.process_line("BAZAR", &mut state),
            LineOutcome::Header("BAZAR".to_string())
        );
        assert_eq!(extractor.process_line("99 X 1 2 3", &mut state), LineOutcome::Rejected);
        assert_eq!(extractor.process_line("hello", &mut state), LineOutcome::Noise);

        match extractor.process_line("5 TAZA 1 2 3 4", &mut state) {
            LineOutcome::Product(record) => assert_eq!(record.category, "BAZAR"),
            other => panic!("expected product, got {:?}", other),
        }
    }

    #[test]
    fn test_strategies_agree_on_sample() {
        let token = PriceListExtractor::new().extract_text(SAMPLE);
        let regex = PriceListExtractor::new()
            .with_parser(Box::new(RegexLineParser::new()))
            .extract_text(SAMPLE);
        assert_eq!(token.products, regex.products);

        let mut config = PriceListConfig::default();
        config.parser.strategy = ParseStrategy::Regex;
        let configured = PriceListExtractor::from_config(&config).extract_text(SAMPLE);
        assert_eq!(configured.products, token.products);
    }

    #[test]
    fn test_custom_classifier_denies_header() {
        let extractor = PriceListExtractor::new()
            .with_classifier(LineClassifier::new().with_denied("VAJILLA"));
        let result = extractor.extract_text(SAMPLE);

        assert_eq!(result.categories, vec!["HOUSEWARES"]);
        assert_eq!(result.products[3].category, "HOUSEWARES");
        assert_eq!(result.products[4].category, "HOUSEWARES");
        assert_eq!(result.stats.headers, 2);
    }

    #[test]
    fn test_empty_document() {
        let result = PriceListExtractor::new().extract_text("");
        assert!(result.products.is_empty());
        assert_eq!(result.stats.total_lines, 0);
    }
}
