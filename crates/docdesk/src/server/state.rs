//! Application state for the document desk server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::DeskConfig;
use crate::error::{Error, Result};
use crate::extraction::ContentExtractor;
use crate::merge::MergeEngine;
use crate::search::SearchEngine;
use crate::storage::{DocumentStore, LocalDocumentStore, UploadPolicy};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: DeskConfig,
    /// Document storage
    store: Arc<dyn DocumentStore>,
    /// Keyword search over the store
    search: SearchEngine,
    /// Named-key merge over the store
    merge: MergeEngine,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state backed by the configured upload directory
    pub fn new(config: DeskConfig) -> Result<Self> {
        let policy = UploadPolicy::new(&config.storage.allowed_extensions);
        let store = LocalDocumentStore::new(&config.storage.upload_dir, policy)?;
        tracing::info!(
            "Document store initialized at {}",
            store.storage_dir().display()
        );
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Create state over an existing store
    pub fn with_store(config: DeskConfig, store: Arc<dyn DocumentStore>) -> Self {
        let search = SearchEngine::new(store.clone(), ContentExtractor::new());
        let merge = MergeEngine::new(store.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                search,
                merge,
                ready: RwLock::new(true),
            }),
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.inner.store
    }

    pub fn search_engine(&self) -> &SearchEngine {
        &self.inner.search
    }

    pub fn merge_engine(&self) -> &MergeEngine {
        &self.inner.merge
    }

    /// Check if ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }

    /// Run synchronous core work on the blocking pool
    pub async fn run_blocking<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&AppState) -> Result<T> + Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || work(&state))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }
}
