//! Clean command - strip stray trailing numbers from exported descriptions.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::{debug, info};

use pricelist_core::error::ExportError;
use pricelist_core::models::product::parse_flag;
use pricelist_core::pricelist::rules::strip_trailing_numbers;

use super::load_config;

/// Number of changed descriptions shown as examples.
const EXAMPLE_COUNT: usize = 5;

/// Arguments for the clean command.
#[derive(Args)]
pub struct CleanArgs {
    /// Exported product CSV
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: <input>_clean.csv next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Counts gathered while cleaning a table.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub rows: usize,
    pub changed: usize,
    pub categories: usize,
    pub low_stock: usize,
    pub examples: Vec<(String, String)>,
}

pub async fn run(args: CleanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    info!("Cleaning {}", args.input.display());

    let input = tokio::fs::read(&args.input).await?;
    let (cleaned, report) = clean_table(&input, config.export.delimiter as u8)?;
    tokio::fs::write(&output_path, cleaned).await?;

    if !report.examples.is_empty() {
        println!("{}", style("Examples:").bold());
        for (before, after) in &report.examples {
            println!("  {}", style(before).dim());
            println!("  {} {}", style("→").green(), after);
        }
        println!();
    }

    println!(
        "{} Cleaned {} of {} descriptions, written to {}",
        style("✓").green(),
        report.changed,
        report.rows,
        output_path.display()
    );
    println!("   Categories: {}", report.categories);
    println!("   Low stock:  {}", report.low_stock);

    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("products");
    input.with_file_name(format!("{}_clean.csv", stem))
}

/// Rewrite the `description` column of a delimited product table.
pub fn clean_table(input: &[u8], delimiter: u8) -> anyhow::Result<(Vec<u8>, CleanReport)> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(input);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let description_idx = column("description")
        .ok_or_else(|| ExportError::MissingColumn("description".to_string()))?;
    let category_idx = column("category");
    let low_stock_idx = column("is_low_stock");

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(vec![]);
    wtr.write_record(&headers)?;

    let mut report = CleanReport::default();
    let mut categories = HashSet::new();

    for record in rdr.records() {
        let record = record?;
        report.rows += 1;

        if let Some(category) = category_idx.and_then(|i| record.get(i)) {
            categories.insert(category.to_string());
        }
        if low_stock_idx
            .and_then(|i| record.get(i))
            .and_then(parse_flag)
            .unwrap_or(false)
        {
            report.low_stock += 1;
        }

        let before = record.get(description_idx).unwrap_or("");
        let after = strip_trailing_numbers(before);

        if after != before {
            report.changed += 1;
            if report.examples.len() < EXAMPLE_COUNT {
                report.examples.push((before.to_string(), after.clone()));
            }
        }

        let row: Vec<&str> = record
            .iter()
            .enumerate()
            .map(|(i, field)| if i == description_idx { after.as_str() } else { field })
            .collect();
        wtr.write_record(&row)?;
    }

    report.categories = categories.len();
    debug!("Cleaned table: {:?}", report);

    Ok((wtr.into_inner()?, report))
}
