//! Product record model and its tabular column contract.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Price field a positional price token is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceColumn {
    /// Unit price, tax excluded.
    UnitExclTax,
    /// Bulk (closed box) price, tax excluded.
    BulkExclTax,
    /// Unit price, tax included.
    UnitInclTax,
    /// Bulk (closed box) price, tax included.
    BulkInclTax,
}

impl PriceColumn {
    /// Name of the record field this column fills.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::UnitExclTax => "unit_price_excl_tax",
            Self::BulkExclTax => "bulk_price_excl_tax",
            Self::UnitInclTax => "unit_price_incl_tax",
            Self::BulkInclTax => "bulk_price_incl_tax",
        }
    }
}

/// Positional mapping of the four trailing price tokens, left to right.
///
/// Matches the current price-list layout: the tax-excluded pair comes first,
/// followed by the tax-included pair.
pub const DEFAULT_PRICE_COLUMNS: [PriceColumn; 4] = [
    PriceColumn::UnitExclTax,
    PriceColumn::BulkExclTax,
    PriceColumn::UnitInclTax,
    PriceColumn::BulkInclTax,
];

/// Check that a price column mapping names every field exactly once.
pub fn check_price_columns(columns: &[PriceColumn; 4]) -> Result<(), ExportError> {
    for (i, column) in columns.iter().enumerate() {
        if columns[..i].contains(column) {
            return Err(ExportError::InvalidMapping(format!(
                "{} mapped more than once",
                column.field_name()
            )));
        }
    }
    Ok(())
}

/// Header of the full delimited export.
pub const EXPORT_COLUMNS: [&str; 10] = [
    "code",
    "description",
    "category",
    "unit_price_incl_tax",
    "bulk_price_incl_tax",
    "unit_price_excl_tax",
    "bulk_price_excl_tax",
    "image_reference",
    "is_active",
    "is_low_stock",
];

/// Header of the compact export, without the tax-excluded prices.
pub const COMPACT_EXPORT_COLUMNS: [&str; 8] = [
    "code",
    "description",
    "category",
    "unit_price_incl_tax",
    "bulk_price_incl_tax",
    "image_reference",
    "is_active",
    "is_low_stock",
];

/// A product parsed from one price-list line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Numeric product code (1-5 digits).
    pub code: String,

    /// Cleaned product name.
    pub description: String,

    /// Category header in effect when the line was read.
    pub category: String,

    /// Unit price, tax included (primary).
    pub unit_price_incl_tax: Decimal,

    /// Bulk price, tax included (primary).
    pub bulk_price_incl_tax: Decimal,

    /// Unit price, tax excluded.
    pub unit_price_excl_tax: Decimal,

    /// Bulk price, tax excluded.
    pub bulk_price_excl_tax: Decimal,

    /// Product image file name, `"{code}.{ext}"`.
    pub image_reference: String,

    /// Always true for freshly parsed records.
    pub is_active: bool,

    /// Description carried a low-stock marker.
    pub is_low_stock: bool,
}

impl ProductRecord {
    /// Create an active record with all prices at zero.
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        image_extension: &str,
    ) -> Self {
        let code = code.into();
        let image_reference = image_reference(&code, image_extension);
        Self {
            code,
            description: description.into(),
            category: category.into(),
            unit_price_incl_tax: Decimal::ZERO,
            bulk_price_incl_tax: Decimal::ZERO,
            unit_price_excl_tax: Decimal::ZERO,
            bulk_price_excl_tax: Decimal::ZERO,
            image_reference,
            is_active: true,
            is_low_stock: false,
        }
    }

    /// Get the price stored in a column.
    pub fn price(&self, column: PriceColumn) -> Decimal {
        match column {
            PriceColumn::UnitExclTax => self.unit_price_excl_tax,
            PriceColumn::BulkExclTax => self.bulk_price_excl_tax,
            PriceColumn::UnitInclTax => self.unit_price_incl_tax,
            PriceColumn::BulkInclTax => self.bulk_price_incl_tax,
        }
    }

    /// Store a price into a column.
    pub fn set_price(&mut self, column: PriceColumn, value: Decimal) {
        match column {
            PriceColumn::UnitExclTax => self.unit_price_excl_tax = value,
            PriceColumn::BulkExclTax => self.bulk_price_excl_tax = value,
            PriceColumn::UnitInclTax => self.unit_price_incl_tax = value,
            PriceColumn::BulkInclTax => self.bulk_price_incl_tax = value,
        }
    }

    /// Prices in source column order for the given mapping.
    pub fn prices_in_order(&self, columns: &[PriceColumn; 4]) -> [Decimal; 4] {
        columns.map(|c| self.price(c))
    }

    /// Row for the full export, aligned with [`EXPORT_COLUMNS`].
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.description.clone(),
            self.category.clone(),
            self.unit_price_incl_tax.to_string(),
            self.bulk_price_incl_tax.to_string(),
            self.unit_price_excl_tax.to_string(),
            self.bulk_price_excl_tax.to_string(),
            self.image_reference.clone(),
            format_flag(self.is_active).to_string(),
            format_flag(self.is_low_stock).to_string(),
        ]
    }

    /// Row for the compact export, aligned with [`COMPACT_EXPORT_COLUMNS`].
    pub fn to_compact_row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.description.clone(),
            self.category.clone(),
            self.unit_price_incl_tax.to_string(),
            self.bulk_price_incl_tax.to_string(),
            self.image_reference.clone(),
            format_flag(self.is_active).to_string(),
            format_flag(self.is_low_stock).to_string(),
        ]
    }
}

/// Image file name derived from a product code.
pub fn image_reference(code: &str, extension: &str) -> String {
    format!("{}.{}", code, extension.trim_start_matches('.'))
}

/// Boolean as written to delimited output.
pub fn format_flag(value: bool) -> &'static str {
    if value { "TRUE" } else { "FALSE" }
}

/// Read back a boolean written by [`format_flag`].
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_uppercase().as_str() {
        "TRUE" => Some(true),
        "FALSE" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn sample() -> ProductRecord {
        let mut record = ProductRecord::new("1500", "WIDGET DELUXE", "HOUSEWARES", "jpg");
        for (column, value) in DEFAULT_PRICE_COLUMNS
            .iter()
            .zip(["10.50", "100.00", "12.70", "121.00"])
        {
            record.set_price(*column, Decimal::from_str(value).unwrap());
        }
        record
    }

    #[test]
    fn test_new_record_defaults() {
        let record = ProductRecord::new("42", "TAZA", "", "jpg");
        assert_eq!(record.image_reference, "42.jpg");
        assert!(record.is_active);
        assert!(!record.is_low_stock);
        assert_eq!(record.unit_price_incl_tax, Decimal::ZERO);
    }

    #[test]
    fn test_image_reference_extension() {
        assert_eq!(image_reference("7", ".png"), "7.png");
        assert_eq!(image_reference("7", "webp"), "7.webp");
    }

    #[test]
    fn test_row_column_order() {
        let row = sample().to_row();
        assert_eq!(row.len(), EXPORT_COLUMNS.len());
        assert_eq!(
            row,
            vec![
                "1500",
                "WIDGET DELUXE",
                "HOUSEWARES",
                "12.70",
                "121.00",
                "10.50",
                "100.00",
                "1500.jpg",
                "TRUE",
                "FALSE",
            ]
        );
    }

    #[test]
    fn test_compact_row_drops_excl_tax() {
        let row = sample().to_compact_row();
        assert_eq!(row.len(), COMPACT_EXPORT_COLUMNS.len());
        assert_eq!(row[3], "12.70");
        assert_eq!(row[4], "121.00");
        assert_eq!(row[5], "1500.jpg");
    }

    #[test]
    fn test_prices_in_order() {
        let prices = sample().prices_in_order(&DEFAULT_PRICE_COLUMNS);
        assert_eq!(prices[0], Decimal::from_str("10.5").unwrap());
        assert_eq!(prices[3], Decimal::from_str("121").unwrap());
    }

    #[test]
    fn test_check_price_columns() {
        assert!(check_price_columns(&DEFAULT_PRICE_COLUMNS).is_ok());
        let duplicated = [
            PriceColumn::UnitInclTax,
            PriceColumn::BulkInclTax,
            PriceColumn::UnitInclTax,
            PriceColumn::BulkExclTax,
        ];
        assert!(check_price_columns(&duplicated).is_err());
    }

    #[test]
    fn test_flags() {
        assert_eq!(format_flag(true), "TRUE");
        assert_eq!(format_flag(false), "FALSE");
        assert_eq!(parse_flag(" true "), Some(true));
        assert_eq!(parse_flag("FALSE"), Some(false));
        assert_eq!(parse_flag("yes"), None);
    }
}
