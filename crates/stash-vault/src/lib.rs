//! # stash-vault
//!
//! The [`Vault`] session object: an explicit holder of the in-memory
//! corpus and its backing [`Store`], exposing every high-level pipeline
//! operation as a state transition followed by a corpus reload. Nothing
//! here mutates shared globals; callers own the `Vault` and drive one
//! operation at a time (two concurrent high-level operations are not
//! safe and must be serialized by the caller).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use stash_core::{item::sort_by_recency, Result, VaultItem};
use stash_enrich::{run_sweep, Analyzer, SweepProgress};
use stash_import::{partition, ConflictSession, Resolution, SessionSummary};
use stash_store::{write_chunked, Store, WRITE_CHUNK_SIZE};

/// Result of importing a parsed batch.
#[derive(Debug)]
pub enum ImportOutcome {
    /// Nothing collided; the ready items are written and the corpus is
    /// already reloaded.
    Complete { imported: usize },
    /// Ready items are written; the collisions await resolution. The
    /// corpus reload happens when the session finishes.
    NeedsResolution {
        imported: usize,
        session: ConflictSession,
    },
}

/// Counts from one enrichment run, after the batch write.
#[derive(Debug, Clone, Copy)]
pub struct EnrichReport {
    pub analyzed: usize,
    pub passed: usize,
    pub failed: usize,
}

/// A live vault: the corpus plus its store.
pub struct Vault {
    store: Arc<dyn Store>,
    items: Vec<VaultItem>,
}

impl Vault {
    /// Open a vault over `store`, performing the initial corpus load.
    pub async fn open(store: Arc<dyn Store>) -> Result<Self> {
        let mut vault = Self {
            store,
            items: Vec::new(),
        };
        vault.reload().await?;
        Ok(vault)
    }

    /// The corpus, newest first.
    pub fn items(&self) -> &[VaultItem] {
        &self.items
    }

    /// Re-read the full corpus from the store and re-sort by recency.
    pub async fn reload(&mut self) -> Result<()> {
        let mut items = self.store.get_all().await?;
        sort_by_recency(&mut items);
        self.items = items;
        Ok(())
    }

    /// Upsert one item (manual add/edit, analysis apply) and reload.
    pub async fn save_item(&mut self, item: &VaultItem) -> Result<()> {
        self.store.put(item).await?;
        self.reload().await
    }

    /// Delete items by id (dedup cleanup) and reload.
    pub async fn delete_items(&mut self, ids: &[String]) -> Result<()> {
        for id in ids {
            self.store.delete(id).await?;
        }
        self.reload().await
    }

    /// Run the import pipeline over an already-parsed batch: detect
    /// duplicates against the corpus, chunk-write the non-conflicting
    /// items, and hand back a conflict session when needed.
    ///
    /// # Errors
    ///
    /// A transport failure mid-chunking aborts the remaining chunks;
    /// chunks already written stay committed.
    pub async fn import_items(&mut self, parsed: Vec<VaultItem>) -> Result<ImportOutcome> {
        let batch = partition(parsed, &self.items);
        let imported = batch.ready.len();

        if !batch.ready.is_empty() {
            write_chunked(self.store.as_ref(), &batch.ready, WRITE_CHUNK_SIZE).await?;
        }

        if batch.conflicts.is_empty() {
            self.reload().await?;
            info!(imported, "import complete, no conflicts");
            return Ok(ImportOutcome::Complete { imported });
        }

        info!(
            imported,
            conflicts = batch.conflicts.len(),
            "import awaiting conflict resolution"
        );
        Ok(ImportOutcome::NeedsResolution {
            imported,
            session: ConflictSession::new(batch.conflicts),
        })
    }

    /// Apply one resolution to a conflict session, performing the by-id
    /// write for `Keep` and the single end-of-session reload.
    ///
    /// The kept item is persisted before the queue advances: a transport
    /// failure leaves the head entry in place, so the same resolution can
    /// be retried.
    ///
    /// Returns the session summary when this action finished the session,
    /// `None` otherwise.
    pub async fn resolve(
        &mut self,
        session: &mut ConflictSession,
        action: Resolution,
    ) -> Result<Option<SessionSummary>> {
        if action == Resolution::Keep {
            if let Some(entry) = session.current() {
                let incoming = entry.incoming.clone();
                self.store.put(&incoming).await?;
            }
        }

        let outcome = session.resolve(action);
        if let Some(summary) = outcome.done {
            self.reload().await?;
            info!(kept = summary.kept, skipped = summary.skipped, "conflict session finished");
            return Ok(Some(summary));
        }
        Ok(None)
    }

    /// Run an enrichment sweep over the corpus (or the subset carrying
    /// `tag_filter`), batch-write every item in the target set, and
    /// reload once.
    pub async fn enrich(
        &mut self,
        analyzer: Arc<dyn Analyzer>,
        tag_filter: Option<&str>,
        on_progress: impl FnMut(SweepProgress),
    ) -> Result<EnrichReport> {
        let target: Vec<VaultItem> = match tag_filter {
            Some(tag) => self
                .items
                .iter()
                .filter(|i| i.tags.iter().any(|t| t == tag))
                .cloned()
                .collect(),
            None => self.items.clone(),
        };

        let outcome = run_sweep(analyzer, target, on_progress).await;
        let report = EnrichReport {
            analyzed: outcome.analyzed,
            passed: outcome.passed,
            failed: outcome.failed,
        };

        write_chunked(self.store.as_ref(), &outcome.items, WRITE_CHUNK_SIZE).await?;
        self.reload().await?;
        Ok(report)
    }

    /// Add `tag` to one item unless it already carries it, then reload.
    /// Returns whether anything was written.
    pub async fn assign_tag(&mut self, id: &str, tag: &str) -> Result<bool> {
        let Some(item) = self.items.iter().find(|i| i.id == id) else {
            return Ok(false);
        };
        if item.tags.iter().any(|t| t == tag) {
            return Ok(false);
        }

        let mut updated = item.clone();
        updated.tags.push(tag.to_string());
        self.save_item(&updated).await?;
        Ok(true)
    }

    /// Rename `old` to `new` across every item carrying it: replaced in
    /// place (position preserved), never appended, and an item that
    /// already carried `new` ends up with it once. Batch-writes only the
    /// changed subset, then reloads.
    ///
    /// Returns the number of items rewritten.
    pub async fn rename_tag(&mut self, old: &str, new: &str) -> Result<usize> {
        let changed: Vec<VaultItem> = self
            .items
            .iter()
            .filter(|i| i.tags.iter().any(|t| t == old))
            .map(|item| {
                let mut item = item.clone();
                for tag in &mut item.tags {
                    if tag == old {
                        *tag = new.to_string();
                    }
                }
                item.dedupe_tags();
                item
            })
            .collect();

        if changed.is_empty() {
            return Ok(0);
        }

        let count = changed.len();
        write_chunked(self.store.as_ref(), &changed, WRITE_CHUNK_SIZE).await?;
        self.reload().await?;
        info!(old, new, items = count, "tag renamed across corpus");
        Ok(count)
    }

    /// Groups of link items sharing identical content, newest first
    /// within each group; only groups of two or more are returned. Feed
    /// the stale ids to [`delete_items`](Vault::delete_items) to clean up.
    pub fn duplicate_groups(&self) -> Vec<Vec<VaultItem>> {
        let mut by_url: HashMap<&str, Vec<&VaultItem>> = HashMap::new();
        for item in self.items.iter().filter(|i| i.is_link()) {
            by_url.entry(item.content.as_str()).or_default().push(item);
        }

        let mut groups: Vec<Vec<VaultItem>> = by_url
            .into_values()
            .filter(|g| g.len() > 1)
            .map(|g| g.into_iter().cloned().collect())
            .collect();
        // Corpus order is already newest-first; order groups by their
        // newest member for a stable presentation.
        groups.sort_by(|a, b| b[0].created_at.cmp(&a[0].created_at));
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_core::ItemType;
    use stash_store::MemoryStore;

    fn link(url: &str, created_at: i64) -> VaultItem {
        let mut item = VaultItem::new(ItemType::Link, url, url);
        item.created_at = created_at;
        item
    }

    async fn vault_with(items: Vec<VaultItem>) -> Vault {
        Vault::open(Arc::new(MemoryStore::seeded(items))).await.unwrap()
    }

    #[tokio::test]
    async fn open_loads_and_sorts_newest_first() {
        let vault = vault_with(vec![link("http://a.com", 100), link("http://b.com", 300)]).await;
        assert_eq!(vault.items()[0].content, "http://b.com");
    }

    #[tokio::test]
    async fn assign_tag_is_idempotent() {
        let mut item = link("http://a.com", 100);
        item.tags = vec!["web".to_string()];
        let id = item.id.clone();
        let mut vault = vault_with(vec![item]).await;

        assert!(vault.assign_tag(&id, "tools").await.unwrap());
        assert!(!vault.assign_tag(&id, "tools").await.unwrap());
        assert_eq!(vault.items()[0].tags, vec!["web", "tools"]);
    }

    #[tokio::test]
    async fn rename_collapses_preexisting_target_tag() {
        let mut item = link("http://a.com", 100);
        item.tags = vec!["draft".to_string(), "final".to_string()];
        let mut vault = vault_with(vec![item]).await;

        let changed = vault.rename_tag("draft", "final").await.unwrap();
        assert_eq!(changed, 1);
        // Replaced in place at draft's position, not accumulated.
        assert_eq!(vault.items()[0].tags, vec!["final"]);
    }

    #[tokio::test]
    async fn rename_preserves_tag_position() {
        let mut item = link("http://a.com", 100);
        item.tags = vec!["a".to_string(), "draft".to_string(), "b".to_string()];
        let mut vault = vault_with(vec![item]).await;

        vault.rename_tag("draft", "published").await.unwrap();
        assert_eq!(vault.items()[0].tags, vec!["a", "published", "b"]);
    }

    #[tokio::test]
    async fn rename_touches_only_carrying_items() {
        let mut tagged = link("http://a.com", 200);
        tagged.tags = vec!["draft".to_string()];
        let untouched = link("http://b.com", 100);
        let mut vault = vault_with(vec![tagged, untouched]).await;

        let changed = vault.rename_tag("draft", "final").await.unwrap();
        assert_eq!(changed, 1);
        assert!(vault.items()[1].tags.is_empty());
    }

    #[tokio::test]
    async fn rename_of_unknown_tag_writes_nothing() {
        let mut vault = vault_with(vec![link("http://a.com", 100)]).await;
        assert_eq!(vault.rename_tag("ghost", "real").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_groups_collect_only_repeated_links() {
        let vault = vault_with(vec![
            link("http://dup.com", 300),
            link("http://dup.com", 100),
            link("http://unique.com", 200),
        ])
        .await;

        let groups = vault.duplicate_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
        // Newest first within the group.
        assert_eq!(groups[0][0].created_at, 300);
    }

    #[tokio::test]
    async fn delete_items_removes_and_reloads() {
        let a = link("http://a.com", 100);
        let id = a.id.clone();
        let mut vault = vault_with(vec![a, link("http://b.com", 200)]).await;

        vault.delete_items(&[id]).await.unwrap();
        assert_eq!(vault.items().len(), 1);
        assert_eq!(vault.items()[0].content, "http://b.com");
    }
}
