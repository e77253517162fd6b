use serde::{Deserialize, Serialize};

/// One entry per stored document in a search response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    /// Stored filename
    pub filename: String,
    /// True iff the keyword occurs in the filename or the extracted content
    pub matched: bool,
}

impl SearchResult {
    pub fn new(filename: impl Into<String>, matched: bool) -> Self {
        Self {
            filename: filename.into(),
            matched,
        }
    }
}
