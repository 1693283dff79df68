//! Local fallback store: one JSON array on disk.
//!
//! The file holds the whole corpus as a JSON array of items in the same
//! camelCase wire shape the remote worker uses, so a local vault can be
//! uploaded as-is later. A missing file reads as an empty corpus.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use stash_core::{Result, StashError, VaultItem};

use crate::{upsert, Store};

/// Store backed by a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_corpus(&self) -> Result<Vec<VaultItem>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StashError::Io(e)),
        };
        serde_json::from_slice(&raw).map_err(|e| StashError::Serialization(e.to_string()))
    }

    async fn write_corpus(&self, corpus: &[VaultItem]) -> Result<()> {
        let raw = serde_json::to_vec_pretty(corpus)
            .map_err(|e| StashError::Serialization(e.to_string()))?;
        tokio::fs::write(&self.path, raw).await.map_err(StashError::Io)
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn get_all(&self) -> Result<Vec<VaultItem>> {
        self.read_corpus().await
    }

    async fn put(&self, item: &VaultItem) -> Result<()> {
        let mut corpus = self.read_corpus().await?;
        upsert(&mut corpus, item);
        self.write_corpus(&corpus).await
    }

    async fn put_batch(&self, items: &[VaultItem]) -> Result<()> {
        let mut corpus = self.read_corpus().await?;
        for item in items {
            upsert(&mut corpus, item);
        }
        self.write_corpus(&corpus).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut corpus = self.read_corpus().await?;
        corpus.retain(|i| i.id != id);
        self.write_corpus(&corpus).await
    }
}
