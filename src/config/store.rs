//! Config persistence: a trait boundary with a JSON file implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::scheduler::ScheduleEntry;

use super::error::ConfigError;
use super::types::ConfigDoc;

/// Storage for the persisted configuration document.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the persisted document.
    async fn load(&self) -> Result<ConfigDoc, ConfigError>;

    /// Overwrite the persisted document.
    async fn save(&self, doc: &ConfigDoc) -> Result<(), ConfigError>;

    /// Load the document, recreating a default one if it is missing or
    /// corrupt. A corrupt document is never a fatal error.
    async fn load_or_reset(&self) -> ConfigDoc {
        match self.load().await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "config unreadable, recreating default document");
                let doc = ConfigDoc::default();
                if let Err(e) = self.save(&doc).await {
                    tracing::warn!(error = %e, "failed to write default config");
                }
                doc
            }
        }
    }

    /// Replace only the schedule list, preserving the rest of the document
    /// (the file may have been hand-edited while the process runs).
    async fn update_schedules(&self, schedules: &[ScheduleEntry]) -> Result<(), ConfigError> {
        let mut doc = self.load_or_reset().await;
        doc.schedules = schedules.to_vec();
        self.save(&doc).await
    }
}

/// File-backed config store writing pretty-printed JSON.
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    /// Create a store over the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a default document if the file is absent, or unconditionally
    /// when `overwrite` is set.
    pub async fn init(&self, overwrite: bool) -> Result<(), ConfigError> {
        if overwrite || !self.path.exists() {
            self.save(&ConfigDoc::default()).await?;
            tracing::info!(path = %self.path.display(), "wrote default config document");
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn load(&self) -> Result<ConfigDoc, ConfigError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, doc: &ConfigDoc) -> Result<(), ConfigError> {
        let json = serde_json::to_vec_pretty(doc)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
