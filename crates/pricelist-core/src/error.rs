//! Error types for the pricelist-core library.
//!
//! Line classification and product parsing never fail; malformed lines are
//! simply skipped. The errors here belong to the surrounding plumbing:
//! loading documents, reading configuration and writing exports.

use thiserror::Error;

/// Main error type for the pricelist library.
#[derive(Error, Debug)]
pub enum PriceListError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Export or post-processing error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to exporting or re-reading product tables.
#[derive(Error, Debug)]
pub enum ExportError {
    /// A required column is absent from a table header.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A price column mapping does not name each field exactly once.
    #[error("invalid price column mapping: {0}")]
    InvalidMapping(String),
}

/// Result type for the pricelist library.
pub type Result<T> = std::result::Result<T, PriceListError>;
