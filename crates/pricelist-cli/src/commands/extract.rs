//! Extract command - pull products out of a single price-list document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info, warn};

use pricelist_core::models::config::{ExportConfig, ParseStrategy, PriceListConfig};
use pricelist_core::models::product::{COMPACT_EXPORT_COLUMNS, EXPORT_COLUMNS};
use pricelist_core::pricelist::{ExtractionResult, ExtractionStats, PriceListExtractor};
use pricelist_core::{CatalogSummary, ProductRecord};

use super::{load_config, read_document_text};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Leave out the tax-excluded price columns
    #[arg(long)]
    compact: bool,

    /// Product line parsing strategy (overrides config)
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Print a catalog summary to stderr
    #[arg(long)]
    summary: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Delimited table
    Csv,
    /// JSON report with statistics
    Json,
    /// Plain text listing
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StrategyArg {
    /// Whitespace tokens with a backward price scan
    Token,
    /// Single full-line regular expression
    Regex,
}

impl From<StrategyArg> for ParseStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Token => ParseStrategy::Token,
            StrategyArg::Regex => ParseStrategy::Regex,
        }
    }
}

/// JSON output document.
#[derive(Serialize)]
struct JsonReport<'a> {
    source: String,
    generated_at: DateTime<Utc>,
    processing_time_ms: u64,
    stats: &'a ExtractionStats,
    categories: &'a [String],
    products: &'a [ProductRecord],
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(strategy) = args.strategy {
        config.parser.strategy = strategy.into();
    }
    if args.compact {
        config.export.compact = true;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let text = read_document_text(&args.input, &config).await?;
    let result = extract_products(&text, &config);

    if result.products.is_empty() {
        anyhow::bail!("No products found in {}", args.input.display());
    }

    let processing_time_ms = start.elapsed().as_millis() as u64;
    let output = format_products(&result, &args.input, processing_time_ms, args.format, &config.export)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} products written to {}",
            style("✓").green(),
            result.products.len(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    if args.summary {
        eprint!("{}", format_summary(&CatalogSummary::from_products(&result.products)));
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Run the extractor configured by `config` over document text.
pub fn extract_products(text: &str, config: &PriceListConfig) -> ExtractionResult {
    let extractor = PriceListExtractor::from_config(config);
    let result = extractor.extract_text(text);

    if result.stats.rejected > 0 {
        warn!(
            "{} product-like lines did not match the expected layout",
            result.stats.rejected
        );
    }

    result
}

/// Render an extraction result in the requested format.
pub fn format_products(
    result: &ExtractionResult,
    source: &Path,
    processing_time_ms: u64,
    format: OutputFormat,
    export: &ExportConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Csv => format_csv(&result.products, export),
        OutputFormat::Json => {
            let report = JsonReport {
                source: source.display().to_string(),
                generated_at: Utc::now(),
                processing_time_ms,
                stats: &result.stats,
                categories: &result.categories,
                products: &result.products,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Text => Ok(format_text(&result.products)),
    }
}

fn format_csv(products: &[ProductRecord], export: &ExportConfig) -> anyhow::Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(export.delimiter as u8)
        .from_writer(vec![]);

    if export.compact {
        wtr.write_record(COMPACT_EXPORT_COLUMNS)?;
        for product in products {
            wtr.write_record(product.to_compact_row())?;
        }
    } else {
        wtr.write_record(EXPORT_COLUMNS)?;
        for product in products {
            wtr.write_record(product.to_row())?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(products: &[ProductRecord]) -> String {
    let mut output = String::new();
    let mut category: Option<&str> = None;

    for product in products {
        if category != Some(product.category.as_str()) {
            if category.is_some() {
                output.push('\n');
            }
            let title = if product.category.is_empty() {
                "(no category)"
            } else {
                product.category.as_str()
            };
            output.push_str(&format!("{}\n", title));
            category = Some(product.category.as_str());
        }

        let marker = if product.is_low_stock { " [low stock]" } else { "" };
        output.push_str(&format!(
            "  [{}] {}{}\n      unit {} | bulk {}\n",
            product.code,
            product.description,
            marker,
            product.unit_price_incl_tax,
            product.bulk_price_incl_tax
        ));
    }

    output
}

/// Human-readable catalog summary.
pub fn format_summary(summary: &CatalogSummary) -> String {
    let mut output = String::new();

    output.push_str("\nSummary:\n");
    output.push_str(&format!("  Products:  {}\n", summary.total_products));
    output.push_str(&format!("  Low stock: {}\n", summary.low_stock));

    if let Some(range) = summary.unit_price_range {
        output.push_str(&format!("  Unit:      {} - {}\n", range.min, range.max));
    }
    if let Some(range) = summary.bulk_price_range {
        output.push_str(&format!("  Bulk:      {} - {}\n", range.min, range.max));
    }

    output.push_str("\nBy category:\n");
    for entry in summary.top_categories(10) {
        let name = if entry.category.is_empty() {
            "(none)"
        } else {
            entry.category.as_str()
        };
        output.push_str(&format!("  {:20} {:4}\n", name, entry.count));
    }

    output
}
