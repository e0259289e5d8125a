//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod clean;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use pricelist_core::models::config::PriceListConfig;
use pricelist_core::pdf::{PdfExtractor, PdfProcessor};

/// Extensions accepted as input documents.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["pdf", "txt", "text"];

/// Per-user configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pricelist")
        .join("config.json")
}

/// Path to the active configuration file: the explicit one, else the per-user one.
pub fn resolve_config_path(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration from an explicit path, the per-user file, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PriceListConfig> {
    let config = if let Some(path) = config_path {
        PriceListConfig::from_file(Path::new(path))?
    } else {
        let path = default_config_path();
        if path.exists() {
            debug!("Using config file {}", path.display());
            PriceListConfig::from_file(&path)?
        } else {
            PriceListConfig::default()
        }
    };
    config.validate()?;
    Ok(config)
}

/// Lower-cased file extension, empty if none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Read the text of a price-list document (PDF or plain text).
pub async fn read_document_text(path: &Path, config: &PriceListConfig) -> anyhow::Result<String> {
    let extension = extension_of(path);

    let text = match extension.as_str() {
        "pdf" => {
            let data = tokio::fs::read(path).await?;
            let mut extractor = PdfExtractor::new();
            extractor.load(&data)?;
            debug!("PDF has {} pages", extractor.page_count());
            extractor.extract_document_text(&config.pdf)?
        }
        "txt" | "text" => tokio::fs::read_to_string(path).await?,
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    if text.trim().is_empty() {
        anyhow::bail!("No text could be extracted from {}", path.display());
    }

    info!("Read {} chars from {}", text.len(), path.display());
    Ok(text)
}
