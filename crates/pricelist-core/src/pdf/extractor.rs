//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

/// Extracted text of a PDF, page by page.
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Page texts joined with a newline.
    pub text: String,
    /// Pages in document order.
    pub pages: Vec<PdfPage>,
}

/// Text from a single PDF page.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page.
    pub text: String,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Extract text page by page, reading at most `max_pages` (0 = all).
    ///
    /// Pages that fail to extract contribute an empty string so that page
    /// order is kept.
    pub fn extract_pages(&self, max_pages: usize) -> Result<PdfContent> {
        let page_count = self.page_count();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let last = if max_pages == 0 {
            page_count
        } else {
            page_count.min(max_pages as u32)
        };

        let mut pages = Vec::with_capacity(last as usize);
        for number in 1..=last {
            let text = match self.extract_page_text(number) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", number, e);
                    String::new()
                }
            };
            pages.push(PdfPage { number, text });
        }

        let text = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        debug!("Extracted {} chars from {} pages", text.len(), pages.len());

        Ok(PdfContent { text, pages })
    }

    /// Extract the document text the way the configuration asks for.
    ///
    /// Per-page extraction falls back to whole-document extraction when it
    /// yields no text.
    pub fn extract_document_text(&self, config: &PdfConfig) -> Result<String> {
        if config.per_page_text {
            let content = self.extract_pages(config.max_pages)?;
            if !content.text.trim().is_empty() {
                return Ok(content.text);
            }
            warn!("Per-page extraction produced no text, falling back to full-document extraction");
        }
        self.extract_text()
    }
}

/// Open an encrypted document with the empty password.
///
/// Returns the re-serialized plain bytes, which `pdf_extract` needs, or
/// `None` when the document was not encrypted.
fn unlock(doc: &mut Document) -> Result<Option<Vec<u8>>> {
    if !doc.is_encrypted() {
        return Ok(None);
    }

    doc.decrypt("").map_err(|_| PdfError::Encrypted)?;
    debug!("Opened encrypted PDF with the empty password");

    let mut plain = Vec::new();
    doc.save_to(&mut plain)
        .map_err(|e| PdfError::Parse(format!("cannot re-serialize decrypted PDF: {}", e)))?;
    Ok(Some(plain))
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        let bytes = unlock(&mut doc)?.unwrap_or_else(|| data.to_vec());

        let pages = doc.get_pages().len();
        if pages == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded price list PDF: {} pages, {} bytes", pages, bytes.len());
        self.raw_data = bytes;
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))?;

        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_extractor_has_no_pages() {
        let extractor = PdfExtractor::default();
        assert!(extractor.document.is_none());
        assert!(extractor.raw_data.is_empty());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_extract_without_document() {
        let extractor = PdfExtractor::new();
        assert!(matches!(extractor.extract_text(), Err(PdfError::Parse(_))));
        assert!(matches!(extractor.extract_page_text(1), Err(PdfError::Parse(_))));
        assert!(matches!(extractor.extract_pages(0), Err(PdfError::NoPages)));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        assert!(matches!(
            extractor.load(b"not a pdf at all"),
            Err(PdfError::Parse(_))
        ));
    }
}
