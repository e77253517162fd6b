//! Keyword search across stored documents
//!
//! Every search enumerates the store and re-extracts each document; there is no index.

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::extraction::ContentExtractor;
use crate::storage::DocumentStore;
use crate::types::{DocumentType, SearchResult};

/// Filename and content keyword search
pub struct SearchEngine {
    store: Arc<dyn DocumentStore>,
    extractor: ContentExtractor,
}

impl SearchEngine {
    pub fn new(store: Arc<dyn DocumentStore>, extractor: ContentExtractor) -> Self {
        Self { store, extractor }
    }

    /// Match `keyword` against every document's filename and extracted text.
    ///
    /// Returns one entry per stored document, matched entries first. Within each group the
    /// order is the store's listing order. A blank keyword returns an empty list without
    /// touching the store. Only a listing failure is an error; unreadable or unparsable
    /// documents count as having no content.
    pub fn search(&self, keyword: &str) -> Result<Vec<SearchResult>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let filenames = self.store.list_documents()?;

        let mut results: Vec<SearchResult> = filenames
            .into_iter()
            .map(|filename| {
                let matched = self.matches(&filename, keyword);
                SearchResult::new(filename, matched)
            })
            .collect();

        // stable: ties keep listing order
        results.sort_by_key(|r| !r.matched);

        let matched = results.iter().filter(|r| r.matched).count();
        tracing::info!(
            "Search '{}': {} of {} documents matched in {:?}",
            keyword,
            matched,
            results.len(),
            start.elapsed()
        );

        Ok(results)
    }

    fn matches(&self, filename: &str, keyword: &str) -> bool {
        if filename.contains(keyword) {
            return true;
        }

        let data = match self.store.read_document(filename) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Could not read '{}' during search: {}", filename, e);
                return false;
            }
        };

        let doc_type = DocumentType::from_filename(filename);
        self.extractor
            .extract(filename, doc_type, &data)
            .contains(keyword)
    }
}
