//! Catalog-level summary over a set of extracted products.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::ProductRecord;

/// Aggregate figures for an extracted catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    /// Number of products.
    pub total_products: usize,

    /// Products per category, largest first (ties by name).
    pub categories: Vec<CategoryCount>,

    /// Products flagged as low stock.
    pub low_stock: usize,

    /// Range of the primary unit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price_range: Option<PriceRange>,

    /// Range of the primary bulk price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_price_range: Option<PriceRange>,
}

/// Product count for a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    fn of(values: impl Iterator<Item = Decimal>) -> Option<Self> {
        values.fold(None, |range, v| match range {
            None => Some(Self { min: v, max: v }),
            Some(r) => Some(Self {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }
}

impl CatalogSummary {
    /// Build a summary from extracted products.
    pub fn from_products(products: &[ProductRecord]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for product in products {
            *counts.entry(product.category.as_str()).or_default() += 1;
        }

        let mut categories: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect();
        categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));

        Self {
            total_products: products.len(),
            categories,
            low_stock: products.iter().filter(|p| p.is_low_stock).count(),
            unit_price_range: PriceRange::of(products.iter().map(|p| p.unit_price_incl_tax)),
            bulk_price_range: PriceRange::of(products.iter().map(|p| p.bulk_price_incl_tax)),
        }
    }

    /// The `n` largest categories.
    pub fn top_categories(&self, n: usize) -> &[CategoryCount] {
        &self.categories[..n.min(self.categories.len())]
    }
}
