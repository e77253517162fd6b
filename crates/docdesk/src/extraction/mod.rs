//! Per-format content extraction
//!
//! Every supported document type has a `TextExtractor` that turns raw bytes into one plain-text
//! blob. `ContentExtractor` dispatches on the type tag computed at the storage boundary and never
//! fails outward: a broken file yields empty text plus a logged diagnostic, so one bad document
//! cannot abort a search batch.

mod docx;
#[cfg(test)]
pub(crate) mod fixtures;
mod pdf;
pub mod tabular;

pub use docx::WordExtractor;
pub use pdf::PdfExtractor;
pub use tabular::{CsvExtractor, SpreadsheetExtractor};

use crate::error::Result;
use crate::types::DocumentType;

/// Extraction backend for one document format
pub trait TextExtractor: Send + Sync {
    /// Extract all searchable text from the document bytes
    fn extract(&self, data: &[u8]) -> Result<String>;

    /// Extractor name for logging
    fn name(&self) -> &str;
}

/// No-op extractor for every type without an implementation
pub struct UnsupportedExtractor;

impl TextExtractor for UnsupportedExtractor {
    fn extract(&self, _data: &[u8]) -> Result<String> {
        Ok(String::new())
    }

    fn name(&self) -> &str {
        "unsupported"
    }
}

/// How an `ExtractedContent` came to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// The format extractor produced the text
    Extracted,
    /// No extractor exists for the type; text is empty by definition
    Unsupported,
    /// Extraction failed; text is empty and the reason was logged
    Failed(String),
}

/// Plain text derived from one document, recomputed on every request
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    text: String,
    outcome: ExtractionOutcome,
}

impl ExtractedContent {
    pub fn extracted(text: String) -> Self {
        Self {
            text,
            outcome: ExtractionOutcome::Extracted,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            text: String::new(),
            outcome: ExtractionOutcome::Unsupported,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            outcome: ExtractionOutcome::Failed(reason.into()),
        }
    }

    /// Case-sensitive substring test
    pub fn contains(&self, keyword: &str) -> bool {
        self.text.contains(keyword)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn outcome(&self) -> &ExtractionOutcome {
        &self.outcome
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, ExtractionOutcome::Failed(_))
    }
}

/// Dispatches extraction to the extractor registered for a document type
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentExtractor;

impl ContentExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extractor registered for a type tag
    pub fn extractor_for(doc_type: DocumentType) -> &'static dyn TextExtractor {
        match doc_type {
            DocumentType::Csv => &CsvExtractor,
            DocumentType::Xlsx | DocumentType::Xls => &SpreadsheetExtractor,
            DocumentType::Pdf => &PdfExtractor,
            DocumentType::Docx => &WordExtractor,
            DocumentType::Hwp | DocumentType::Unsupported => &UnsupportedExtractor,
        }
    }

    /// Extract a document's text; never fails
    pub fn extract(&self, filename: &str, doc_type: DocumentType, data: &[u8]) -> ExtractedContent {
        if !doc_type.is_extractable() {
            tracing::debug!("No extractor for '{}' ({:?})", filename, doc_type);
            return ExtractedContent::unsupported();
        }

        let extractor = Self::extractor_for(doc_type);
        match extractor.extract(data) {
            Ok(text) => {
                tracing::debug!(
                    "Extracted {} chars from '{}' via {}",
                    text.len(),
                    filename,
                    extractor.name()
                );
                ExtractedContent::extracted(text)
            }
            Err(e) => {
                tracing::warn!(
                    "Extraction failed for '{}' ({}): {}",
                    filename,
                    extractor.name(),
                    e
                );
                ExtractedContent::failed(e.to_string())
            }
        }
    }
}
