//! # stash-store
//!
//! Storage collaborator contract and backends for the Stash vault.
//!
//! The pipeline only ever talks to [`Store`]: a key-value corpus with
//! upsert-by-id semantics. Three backends implement it:
//! - [`MemoryStore`] — in-process, the primary test double
//! - [`JsonFileStore`] — local fallback, one JSON array on disk
//! - [`HttpStore`] — remote KV worker behind a bearer token
//!
//! The chunked batch writer ([`batch::write_chunked`]) lives here too,
//! since bounding payload size is a property of how we talk to a store,
//! not of any one pipeline stage.

pub mod batch;
pub mod file;
pub mod http;
pub mod memory;

use async_trait::async_trait;

use stash_core::{Result, VaultItem};

pub use batch::{write_chunked, WRITE_CHUNK_SIZE};
pub use file::JsonFileStore;
pub use http::HttpStore;
pub use memory::MemoryStore;

/// The read/write contract every backend honors.
///
/// `put` and `put_batch` upsert by id, merging into whatever corpus
/// already exists. Operations fail with
/// [`stash_core::StashError::Transport`]; the pipeline never retries
/// automatically.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the entire corpus.
    async fn get_all(&self) -> Result<Vec<VaultItem>>;

    /// Upsert a single item by id.
    async fn put(&self, item: &VaultItem) -> Result<()>;

    /// Upsert a batch of items by id.
    async fn put_batch(&self, items: &[VaultItem]) -> Result<()>;

    /// Delete an item by id. Deleting an unknown id is not an error.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Upsert `incoming` into `corpus` by id, in place. Shared by the local
/// backends so both have identical merge semantics.
pub(crate) fn upsert(corpus: &mut Vec<VaultItem>, incoming: &VaultItem) {
    let mut item = incoming.clone();
    item.dedupe_tags();
    match corpus.iter_mut().find(|i| i.id == item.id) {
        Some(slot) => *slot = item,
        None => corpus.push(item),
    }
}
