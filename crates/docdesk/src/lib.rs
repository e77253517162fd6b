//! docdesk: keyword search and named-key spreadsheet merging over a document folder
//!
//! This crate provides the core of a small document desk. Users upload spreadsheets, PDFs and
//! Word files into a storage folder; the search engine re-extracts every document's text on each
//! request and matches a keyword against filenames and content, and the merge engine reconciles a
//! key/value "base" record with a row-oriented candidate table into one downloadable sheet.

pub mod config;
pub mod error;
pub mod extraction;
pub mod merge;
pub mod search;
pub mod server;
pub mod storage;
pub mod types;

pub use config::DeskConfig;
pub use error::{Error, Result};
pub use extraction::{ContentExtractor, ExtractedContent};
pub use merge::{MergeEngine, MergeFormat, Table};
pub use search::SearchEngine;
pub use storage::{DocumentStore, InMemoryDocumentStore, LocalDocumentStore};
pub use types::{DocumentInfo, DocumentType, SearchResult};
