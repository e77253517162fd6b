//! Local filesystem document store

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::DocumentInfo;

use super::filename::{validate_lookup_name, UploadPolicy};
use super::DocumentStore;

/// Local document store using one flat directory
pub struct LocalDocumentStore {
    /// Directory holding the documents
    storage_dir: PathBuf,
    /// Upload allow-list
    policy: UploadPolicy,
}

impl LocalDocumentStore {
    /// Create a new local document store, creating the directory if needed
    pub fn new(storage_dir: impl Into<PathBuf>, policy: UploadPolicy) -> Result<Self> {
        let storage_dir = storage_dir.into();
        std::fs::create_dir_all(&storage_dir)?;
        Ok(Self {
            storage_dir,
            policy,
        })
    }

    /// Directory holding the documents
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Get path for a document, rejecting names that leave the directory
    fn doc_path(&self, filename: &str) -> Result<PathBuf> {
        validate_lookup_name(filename)?;
        Ok(self.storage_dir.join(filename))
    }

    /// Path of an existing document, `DocumentNotFound` otherwise
    fn existing_path(&self, filename: &str) -> Result<PathBuf> {
        let path = self.doc_path(filename)?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(Error::DocumentNotFound(filename.to_string()))
        }
    }
}

impl DocumentStore for LocalDocumentStore {
    fn list_documents(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in std::fs::read_dir(&self.storage_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                tracing::debug!("Skipping non-file entry {}", entry.path().display());
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    tracing::warn!("Skipping non UTF-8 filename {:?}", raw);
                }
            }
        }

        Ok(names)
    }

    fn read_document(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.existing_path(filename)?;
        std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::DocumentNotFound(filename.to_string()),
            _ => Error::Io(e),
        })
    }

    fn write_document(&self, filename: &str, data: &[u8]) -> Result<String> {
        let stored = self.policy.admit(filename)?;
        let path = self.doc_path(&stored)?;

        if path.exists() {
            tracing::info!("Overwriting existing document '{}'", stored);
        }
        std::fs::write(&path, data)?;

        tracing::debug!("Stored '{}' ({} bytes)", stored, data.len());
        Ok(stored)
    }

    fn delete_document(&self, filename: &str) -> Result<()> {
        let path = self.existing_path(filename)?;
        std::fs::remove_file(&path)?;
        tracing::info!("Deleted document '{}'", filename);
        Ok(())
    }

    fn exists(&self, filename: &str) -> Result<bool> {
        Ok(self.doc_path(filename)?.is_file())
    }

    fn stat(&self, filename: &str) -> Result<DocumentInfo> {
        let path = self.existing_path(filename)?;
        let metadata = std::fs::metadata(&path)?;
        Ok(DocumentInfo::new(filename, metadata.len()))
    }

    fn name(&self) -> &str {
        "local-filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentType;

    fn store() -> (tempfile::TempDir, LocalDocumentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store =
            LocalDocumentStore::new(dir.path().join("uploads"), UploadPolicy::new(["csv", "pdf"]))
                .unwrap();
        (dir, store)
    }

    #[test]
    fn test_write_read_roundtrip() {
        let (_dir, store) = store();
        let stored = store.write_document("sales report.csv", b"a,b\n1,2\n").unwrap();
        assert_eq!(stored, "sales_report.csv");
        assert_eq!(store.read_document(&stored).unwrap(), b"a,b\n1,2\n");
        assert!(store.exists(&stored).unwrap());
    }

    #[test]
    fn test_write_overwrites_same_name() {
        let (_dir, store) = store();
        store.write_document("a.csv", b"old").unwrap();
        store.write_document("a.csv", b"new").unwrap();
        assert_eq!(store.read_document("a.csv").unwrap(), b"new");
        assert_eq!(store.list_documents().unwrap(), vec!["a.csv".to_string()]);
    }

    #[test]
    fn test_write_rejects_disallowed_extension() {
        let (_dir, store) = store();
        assert!(matches!(
            store.write_document("macro.xlsm", b"x"),
            Err(Error::UnsupportedFileType(_))
        ));
        assert!(store.list_documents().unwrap().is_empty());
    }

    #[test]
    fn test_missing_document_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(
            store.read_document("ghost.csv"),
            Err(Error::DocumentNotFound(_))
        ));
        assert!(matches!(
            store.delete_document("ghost.csv"),
            Err(Error::DocumentNotFound(_))
        ));
        assert!(!store.exists("ghost.csv").unwrap());
    }

    #[test]
    fn test_traversal_names_are_rejected() {
        let (_dir, store) = store();
        assert!(matches!(
            store.read_document("../secret.csv"),
            Err(Error::InvalidFilename(_))
        ));
    }

    #[test]
    fn test_list_skips_directories_and_stat_reports_size() {
        let (_dir, store) = store();
        std::fs::create_dir(store.storage_dir().join("nested")).unwrap();
        store.write_document("report.pdf", b"%PDF-1.4").unwrap();

        let names = store.list_documents().unwrap();
        assert_eq!(names, vec!["report.pdf".to_string()]);

        let info = store.stat("report.pdf").unwrap();
        assert_eq!(info.size, 8);
        assert_eq!(info.file_type, DocumentType::Pdf);
    }

    #[test]
    fn test_delete_removes_document() {
        let (_dir, store) = store();
        store.write_document("a.csv", b"x").unwrap();
        store.delete_document("a.csv").unwrap();
        assert!(store.list_documents().unwrap().is_empty());
    }
}
