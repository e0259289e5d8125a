//! Batch command - extract products from many price lists at once.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use pricelist_core::models::config::PriceListConfig;
use pricelist_core::pricelist::ExtractionResult;

use super::extract::{extract_products, format_products, OutputFormat};
use super::{extension_of, load_config, read_document_text, SUPPORTED_EXTENSIONS};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching the input documents
    #[arg(required = true)]
    input: String,

    /// Directory for the per-document exports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Export format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Leave out the tax-excluded price columns
    #[arg(long)]
    compact: bool,

    /// Write summary.csv with one row per document
    #[arg(long)]
    summary: bool,

    /// Keep going when a document fails
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome for one input document.
struct FileOutcome {
    path: PathBuf,
    elapsed: Duration,
    result: Result<ExtractionResult, String>,
}

/// One line of summary.csv.
#[derive(Serialize)]
struct SummaryRow<'a> {
    filename: &'a str,
    status: &'a str,
    products: Option<usize>,
    categories: Option<usize>,
    low_stock: Option<usize>,
    rejected_lines: Option<usize>,
    processing_time_ms: u64,
    error: &'a str,
}

impl<'a> SummaryRow<'a> {
    fn from_outcome(outcome: &'a FileOutcome) -> Self {
        let filename = outcome
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let processing_time_ms = outcome.elapsed.as_millis() as u64;

        match &outcome.result {
            Ok(extraction) => Self {
                filename,
                status: "success",
                products: Some(extraction.products.len()),
                categories: Some(extraction.categories.len()),
                low_stock: Some(extraction.products.iter().filter(|p| p.is_low_stock).count()),
                rejected_lines: Some(extraction.stats.rejected),
                processing_time_ms,
                error: "",
            },
            Err(message) => Self {
                filename,
                status: "error",
                products: None,
                categories: None,
                low_stock: None,
                rejected_lines: None,
                processing_time_ms,
                error: message,
            },
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.compact {
        config.export.compact = true;
    }

    let inputs = collect_inputs(&args.input)?;
    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        inputs.len()
    );

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)?;
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut outcomes: Vec<FileOutcome> = Vec::with_capacity(inputs.len());

    for path in inputs {
        pb.set_message(display_name(&path).to_string());

        let file_start = Instant::now();
        let result = extract_file(&path, &config).await;
        let elapsed = file_start.elapsed();

        let result = match result {
            Ok(extraction) => {
                if let Some(dir) = &args.output_dir {
                    export_file(&path, &extraction, dir, elapsed, args.format, &config)?;
                }
                Ok(extraction)
            }
            Err(e) if args.continue_on_error => {
                warn!("Skipping {}: {}", path.display(), e);
                Err(e.to_string())
            }
            Err(e) => {
                error!("Failed on {}: {}", path.display(), e);
                pb.abandon();
                anyhow::bail!("Processing failed for {}: {}", path.display(), e);
            }
        };

        outcomes.push(FileOutcome { path, elapsed, result });
        pb.inc(1);
    }

    pb.finish_and_clear();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
            .join("summary.csv");
        write_summary(&summary_path, &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_totals(&outcomes, start.elapsed());

    Ok(())
}

fn collect_inputs(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut inputs: Vec<PathBuf> = glob::glob(pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Unreadable glob entry: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .filter(|path| SUPPORTED_EXTENSIONS.contains(&extension_of(path).as_str()))
        .collect();

    if inputs.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", pattern);
    }

    inputs.sort();
    Ok(inputs)
}

fn display_name(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or("")
}

async fn extract_file(path: &Path, config: &PriceListConfig) -> anyhow::Result<ExtractionResult> {
    let text = read_document_text(path, config).await?;
    let extraction = extract_products(&text, config);

    if extraction.products.is_empty() {
        anyhow::bail!("No products found");
    }

    Ok(extraction)
}

fn export_file(
    path: &Path,
    extraction: &ExtractionResult,
    dir: &Path,
    elapsed: Duration,
    format: OutputFormat,
    config: &PriceListConfig,
) -> anyhow::Result<()> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pricelist");
    let target = dir.join(format!("{}.{}", stem, format.extension()));

    let content = format_products(
        extraction,
        path,
        elapsed.as_millis() as u64,
        format,
        &config.export,
    )?;
    fs::write(&target, content)?;

    debug!("{} -> {}", path.display(), target.display());
    Ok(())
}

fn write_summary(path: &Path, outcomes: &[FileOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for outcome in outcomes {
        wtr.serialize(SummaryRow::from_outcome(outcome))?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_totals(outcomes: &[FileOutcome], elapsed: Duration) {
    let extractions: Vec<&ExtractionResult> =
        outcomes.iter().filter_map(|o| o.result.as_ref().ok()).collect();
    let failures: Vec<(&Path, &str)> = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().err().map(|e| (o.path.as_path(), e.as_str())))
        .collect();

    let products: usize = extractions.iter().map(|e| e.products.len()).sum();
    let categories: BTreeSet<&str> = extractions
        .iter()
        .copied()
        .flat_map(|e| e.categories.iter().map(String::as_str))
        .collect();

    println!();
    println!(
        "{} Processed {} files in {:.2?}: {} products across {} categories",
        style("✓").green(),
        outcomes.len(),
        elapsed,
        products,
        categories.len()
    );
    println!(
        "   {} succeeded, {} failed",
        style(extractions.len()).green(),
        style(failures.len()).red()
    );

    if !failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for (path, message) in failures {
            println!("  - {}: {}", path.display(), message);
        }
    }
}
