//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::PriceListError;
use super::product::{check_price_columns, PriceColumn, DEFAULT_PRICE_COLUMNS};

/// Boilerplate lines repeated on every page that look like category headers.
pub const DEFAULT_HEADER_DENYLIST: [&str; 5] = [
    "LISTA DE PRECIOS POR RUBRO",
    "TODO PARA LA GASTRONOMIA S.A.",
    "EL PRECIO UNITARIO ES POR BULTO CERRADO",
    "CODIGO",
    "DESCRIPCION",
];

/// Main configuration for the pricelist pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceListConfig {
    /// Line classification configuration.
    pub classifier: ClassifierConfig,

    /// Product line parsing configuration.
    pub parser: ParserConfig,

    /// Tabular export configuration.
    pub export: ExportConfig,

    /// PDF text extraction configuration.
    pub pdf: PdfConfig,
}

/// Category header detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Header length must be strictly greater than this (in characters).
    pub min_header_len: usize,

    /// Header length must be strictly less than this (in characters).
    pub max_header_len: usize,

    /// Exact lines never treated as headers.
    pub denylist: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_header_len: 3,
            max_header_len: 30,
            denylist: DEFAULT_HEADER_DENYLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Product line parsing strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    /// Whitespace tokenizer with a backward price scan.
    #[default]
    Token,
    /// Single full-line regular expression.
    Regex,
}

/// Product line parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Which line parser to use.
    pub strategy: ParseStrategy,

    /// Minimum whitespace tokens for a product line.
    pub min_tokens: usize,

    /// Field written by each trailing price token, left to right.
    pub price_columns: [PriceColumn; 4],

    /// Extension used for the derived image reference.
    pub image_extension: String,

    /// Drop stray trailing numbers left in descriptions.
    pub strip_trailing_numbers: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strategy: ParseStrategy::Token,
            min_tokens: 6,
            price_columns: DEFAULT_PRICE_COLUMNS,
            image_extension: "jpg".to_string(),
            strip_trailing_numbers: false,
        }
    }
}

/// Tabular export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Omit the tax-excluded price columns.
    pub compact: bool,

    /// Field delimiter for delimited output.
    pub delimiter: char,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            compact: false,
            delimiter: ',',
        }
    }
}

/// PDF text extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Extract text page by page and join pages with a newline.
    pub per_page_text: bool,

    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            per_page_text: true,
            max_pages: 0,
        }
    }
}

impl PriceListConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check values that serde alone cannot.
    pub fn validate(&self) -> Result<(), PriceListError> {
        check_price_columns(&self.parser.price_columns)?;

        if self.classifier.min_header_len >= self.classifier.max_header_len {
            return Err(PriceListError::Config(format!(
                "classifier.min_header_len ({}) must be below max_header_len ({})",
                self.classifier.min_header_len, self.classifier.max_header_len
            )));
        }

        if self.parser.min_tokens < 6 {
            return Err(PriceListError::Config(format!(
                "parser.min_tokens must be at least 6, got {}",
                self.parser.min_tokens
            )));
        }

        if !self.export.delimiter.is_ascii() {
            return Err(PriceListError::Config(format!(
                "export.delimiter must be ASCII, got {:?}",
                self.export.delimiter
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = PriceListConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.parser.price_columns, DEFAULT_PRICE_COLUMNS);
        assert_eq!(config.classifier.denylist.len(), DEFAULT_HEADER_DENYLIST.len());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PriceListConfig =
            serde_json::from_str(r#"{"parser": {"strategy": "regex"}}"#).unwrap();
        assert_eq!(config.parser.strategy, ParseStrategy::Regex);
        assert_eq!(config.parser.min_tokens, 6);
        assert_eq!(config.classifier.max_header_len, 30);
    }

    #[test]
    fn test_swapped_mapping_from_json() {
        let json = r#"{"parser": {"price_columns":
            ["unit_incl_tax", "bulk_incl_tax", "unit_excl_tax", "bulk_excl_tax"]}}"#;
        let config: PriceListConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.parser.price_columns[0], PriceColumn::UnitInclTax);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = PriceListConfig::default();
        config.parser.price_columns = [PriceColumn::UnitInclTax; 4];
        assert!(config.validate().is_err());

        let mut config = PriceListConfig::default();
        config.classifier.min_header_len = 40;
        assert!(config.validate().is_err());

        let mut config = PriceListConfig::default();
        config.parser.min_tokens = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("pricelist-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let mut config = PriceListConfig::default();
        config.export.compact = true;
        config.save(&path).unwrap();

        let loaded = PriceListConfig::from_file(&path).unwrap();
        assert!(loaded.export.compact);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
