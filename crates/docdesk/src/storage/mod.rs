//! Storage gateway for uploaded documents
//!
//! The search and merge engines never touch the filesystem directly: they receive an
//! `Arc<dyn DocumentStore>`. `LocalDocumentStore` backs the server and CLI with one flat upload
//! directory; `InMemoryDocumentStore` is the in-process double used by tests.

pub mod filename;
pub mod local;
pub mod memory;

pub use filename::{secure_filename, UploadPolicy};
pub use local::LocalDocumentStore;
pub use memory::InMemoryDocumentStore;

use crate::error::Result;
use crate::types::DocumentInfo;

/// Trait for document storage
///
/// Implementations:
/// - `LocalDocumentStore`: flat directory on the local filesystem
/// - `InMemoryDocumentStore`: insertion-ordered in-memory map
pub trait DocumentStore: Send + Sync {
    /// List stored filenames in the backend's enumeration order (never sorted)
    fn list_documents(&self) -> Result<Vec<String>>;

    /// Read a document's bytes; `DocumentNotFound` when absent
    fn read_document(&self, filename: &str) -> Result<Vec<u8>>;

    /// Store a document, overwriting any document of the same name
    ///
    /// Returns the stored (sanitized) filename
    fn write_document(&self, filename: &str, data: &[u8]) -> Result<String>;

    /// Delete a document; `DocumentNotFound` when absent
    fn delete_document(&self, filename: &str) -> Result<()>;

    /// Check if a document exists
    fn exists(&self, filename: &str) -> Result<bool>;

    /// Metadata for a stored document
    fn stat(&self, filename: &str) -> Result<DocumentInfo>;

    /// Get store name for logging
    fn name(&self) -> &str;

    /// Metadata for every stored document, in listing order
    ///
    /// Documents that disappear between the listing and the stat call are skipped.
    fn list_info(&self) -> Result<Vec<DocumentInfo>> {
        let mut infos = Vec::new();
        for filename in self.list_documents()? {
            match self.stat(&filename) {
                Ok(info) => infos.push(info),
                Err(e) => tracing::debug!("Skipping '{}' in listing: {}", filename, e),
            }
        }
        Ok(infos)
    }
}
