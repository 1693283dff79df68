//! In-memory store backend.

use async_trait::async_trait;
use tokio::sync::Mutex;

use stash_core::{Result, VaultItem};

use crate::{upsert, Store};

/// An in-process corpus behind a mutex. Used as the test double across
/// the workspace and as the backing for throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<Vec<VaultItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with an existing corpus.
    pub fn seeded(items: Vec<VaultItem>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_all(&self) -> Result<Vec<VaultItem>> {
        Ok(self.items.lock().await.clone())
    }

    async fn put(&self, item: &VaultItem) -> Result<()> {
        let mut corpus = self.items.lock().await;
        upsert(&mut corpus, item);
        Ok(())
    }

    async fn put_batch(&self, items: &[VaultItem]) -> Result<()> {
        let mut corpus = self.items.lock().await;
        for item in items {
            upsert(&mut corpus, item);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut corpus = self.items.lock().await;
        corpus.retain(|i| i.id != id);
        Ok(())
    }
}
