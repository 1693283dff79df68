//! VaultItem — the canonical record in the Stash vault.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of content an item carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// A URL; `content` holds the address and is the item's duplicate
    /// identity.
    Link,
    /// Free text.
    Note,
    /// A code fragment.
    Snippet,
}

/// A single vault record. The wire shape is camelCase JSON, matching the
/// export format of the original web client, so stored corpora stay
/// readable by both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultItem {
    /// Opaque unique identifier, assigned at creation, immutable.
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Raw payload: URL for links, free text otherwise.
    pub content: String,
    /// Display label.
    pub title: String,
    /// Short description. Empty string means "blank", which is a valid
    /// value distinct from never-analyzed in the eligibility filter.
    #[serde(default)]
    pub summary: String,
    /// Ordered tag list. Order is display-significant; a single item never
    /// carries the same tag twice (duplicates collapse on write).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation time in epoch milliseconds; drives the recency sort.
    pub created_at: i64,
}

impl VaultItem {
    /// Build a new item with a fresh id and the current time.
    pub fn new(item_type: ItemType, content: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: new_item_id(),
            item_type,
            content: content.into(),
            title: title.into(),
            summary: String::new(),
            tags: Vec::new(),
            created_at: now_millis(),
        }
    }

    /// True for link items, whose `content` participates in duplicate
    /// detection.
    pub fn is_link(&self) -> bool {
        self.item_type == ItemType::Link
    }

    /// Collapse duplicate tags in place, keeping the first occurrence of
    /// each value so display order is preserved.
    pub fn dedupe_tags(&mut self) {
        let mut seen = Vec::with_capacity(self.tags.len());
        self.tags.retain(|tag| {
            if seen.contains(tag) {
                false
            } else {
                seen.push(tag.clone());
                true
            }
        });
    }
}

/// Generate a fresh opaque item id.
pub fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Sort a corpus newest-first, the canonical display order.
pub fn sort_by_recency(items: &mut [VaultItem]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
