//! Local filesystem storage implementation.
//!
//! Keeps the baseline in one JSON file. Writes go to a sibling `.tmp` file
//! which is then renamed over the target, so a reader sees either the old
//! or the new baseline.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::AnimalRecord;
use crate::storage::SnapshotStore;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
    lenient: bool,
}

impl LocalStorage {
    /// Create a LocalStorage for the given state file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lenient: cfg!(feature = "lenient-state"),
        }
    }

    /// Override how an unreadable state file is handled.
    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::persistence(&self.path, e)),
        }
    }

    async fn read_records(&self) -> Result<Option<Vec<AnimalRecord>>> {
        match self.read_bytes().await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| AppError::persistence(&self.path, e)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SnapshotStore for LocalStorage {
    async fn load(&self) -> Result<Option<Vec<AnimalRecord>>> {
        match self.read_records().await {
            Ok(Some(records)) => {
                log::debug!(
                    "Loaded {} records from {}",
                    records.len(),
                    self.path.display()
                );
                Ok(Some(records))
            }
            Ok(None) => {
                log::info!("No baseline found at {}", self.path.display());
                Ok(None)
            }
            Err(e) if self.lenient => {
                log::warn!("{}; discarding it and starting a new baseline", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn save(&self, records: &[AnimalRecord]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        self.write_bytes(&bytes).await?;
        log::info!(
            "Baseline of {} records written to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}
