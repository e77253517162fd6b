//! In-memory document store

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::types::DocumentInfo;

use super::filename::UploadPolicy;
use super::DocumentStore;

/// Insertion-ordered in-memory document store
///
/// Listing order is the order in which names were first written; overwriting a document keeps
/// its original position.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<(String, Vec<u8>)>>,
    policy: UploadPolicy,
}

impl InMemoryDocumentStore {
    /// Create an empty store that accepts every extension
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with an upload allow-list
    pub fn with_policy(policy: UploadPolicy) -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            policy,
        }
    }

    /// Build a store from `(filename, bytes)` pairs, stored verbatim in the given order
    pub fn from_documents<I, N, D>(documents: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<Vec<u8>>,
    {
        let documents = documents
            .into_iter()
            .map(|(name, data)| (name.into(), data.into()))
            .collect();
        Self {
            documents: RwLock::new(documents),
            policy: UploadPolicy::permissive(),
        }
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn list_documents(&self) -> Result<Vec<String>> {
        Ok(self
            .documents
            .read()
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn read_document(&self, filename: &str) -> Result<Vec<u8>> {
        self.documents
            .read()
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| Error::DocumentNotFound(filename.to_string()))
    }

    fn write_document(&self, filename: &str, data: &[u8]) -> Result<String> {
        let stored = self.policy.admit(filename)?;
        let mut documents = self.documents.write();
        match documents.iter_mut().find(|(name, _)| *name == stored) {
            Some((_, existing)) => *existing = data.to_vec(),
            None => documents.push((stored.clone(), data.to_vec())),
        }
        Ok(stored)
    }

    fn delete_document(&self, filename: &str) -> Result<()> {
        let mut documents = self.documents.write();
        let position = documents
            .iter()
            .position(|(name, _)| name == filename)
            .ok_or_else(|| Error::DocumentNotFound(filename.to_string()))?;
        documents.remove(position);
        Ok(())
    }

    fn exists(&self, filename: &str) -> Result<bool> {
        Ok(self
            .documents
            .read()
            .iter()
            .any(|(name, _)| name == filename))
    }

    fn stat(&self, filename: &str) -> Result<DocumentInfo> {
        self.documents
            .read()
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(name, data)| DocumentInfo::new(name.clone(), data.len() as u64))
            .ok_or_else(|| Error::DocumentNotFound(filename.to_string()))
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
