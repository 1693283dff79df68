//! Duplicate detection against the existing corpus.
//!
//! Only exact-URL duplicates between link items are detected; notes and
//! snippets never conflict, whatever their content. The scan is linear
//! per parsed item, which is fine at personal-corpus scale (thousands,
//! not millions).

use tracing::info;

use stash_core::VaultItem;

/// An incoming link item paired with the corpus item it collides with.
#[derive(Debug, Clone)]
pub struct ConflictEntry {
    pub incoming: VaultItem,
    pub existing: VaultItem,
}

/// One import's worth of parsed items, split by conflict status. Purely
/// ephemeral; never persisted as an entity.
#[derive(Debug, Default)]
pub struct ImportBatch {
    /// Items with no corpus collision, ready for a chunked write.
    pub ready: Vec<VaultItem>,
    /// Collisions awaiting user-mediated resolution, in parse order.
    pub conflicts: Vec<ConflictEntry>,
}

/// Partition freshly parsed items against the current corpus.
///
/// A link item conflicts when some corpus link has byte-identical
/// `content` (case-sensitive, no URL normalization). When the corpus
/// itself already contains duplicates, the first match wins.
pub fn partition(parsed: Vec<VaultItem>, corpus: &[VaultItem]) -> ImportBatch {
    let mut batch = ImportBatch::default();

    for item in parsed {
        if item.is_link() {
            let existing = corpus
                .iter()
                .find(|i| i.is_link() && i.content == item.content);
            match existing {
                Some(existing) => batch.conflicts.push(ConflictEntry {
                    incoming: item,
                    existing: existing.clone(),
                }),
                None => batch.ready.push(item),
            }
        } else {
            batch.ready.push(item);
        }
    }

    info!(
        ready = batch.ready.len(),
        conflicts = batch.conflicts.len(),
        "partitioned import batch"
    );
    batch
}
