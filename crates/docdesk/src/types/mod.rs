//! Core types for the document desk

pub mod document;
pub mod search;

pub use document::{DocumentInfo, DocumentType};
pub use search::SearchResult;
