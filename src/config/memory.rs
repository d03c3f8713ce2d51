//! In-memory config store.
//!
//! Backs tests and ephemeral runs; nothing is persisted across restarts.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use super::error::ConfigError;
use super::store::ConfigStore;
use super::types::ConfigDoc;

/// Config store holding the document in memory.
pub struct InMemoryConfigStore {
    doc: RwLock<ConfigDoc>,
    saves: AtomicUsize,
}

impl InMemoryConfigStore {
    /// Create a store with a default document.
    pub fn new() -> Self {
        Self::with_doc(ConfigDoc::default())
    }

    /// Create a store seeded with the given document.
    pub fn with_doc(doc: ConfigDoc) -> Self {
        Self {
            doc: RwLock::new(doc),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of times the document has been saved.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// A copy of the current document, for assertions.
    pub fn snapshot(&self) -> ConfigDoc {
        self.doc.read().map(|d| d.clone()).unwrap_or_default()
    }
}

impl Default for InMemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn load(&self) -> Result<ConfigDoc, ConfigError> {
        let doc = self.doc.read().map_err(|_| ConfigError::LockPoisoned)?;
        Ok(doc.clone())
    }

    async fn save(&self, doc: &ConfigDoc) -> Result<(), ConfigError> {
        let mut stored = self.doc.write().map_err(|_| ConfigError::LockPoisoned)?;
        *stored = doc.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
