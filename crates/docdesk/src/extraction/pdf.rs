//! PDF text extraction

use crate::error::{Error, Result};

use super::TextExtractor;

/// Page-ordered PDF text extractor
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse("document.pdf", e.to_string()))?;

        let pages: Vec<String> = doc
            .get_pages()
            .keys()
            .map(|&page_number| match doc.extract_text(&[page_number]) {
                Ok(text) => text.trim_end().to_string(),
                Err(e) => {
                    tracing::debug!("No text on PDF page {}: {}", page_number, e);
                    String::new()
                }
            })
            .collect();

        Ok(pages.join("\n"))
    }

    fn name(&self) -> &str {
        "pdf"
    }
}
