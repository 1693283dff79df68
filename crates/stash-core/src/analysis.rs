//! Output contract of the external content-analysis collaborator.

use serde::{Deserialize, Serialize};

use crate::item::{ItemType, VaultItem};
use crate::{FALLBACK_TITLE, GENERIC_TAG};

/// What the analysis collaborator produces for a piece of content.
///
/// Applied wholesale onto an item: title, summary, tags and type are all
/// replaced. The analyzer's own model and prompt mechanics are outside
/// this crate; only this shape matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub item_type: ItemType,
}

impl ContentAnalysis {
    /// The result substituted when the collaborator fails: a generic
    /// placeholder plus a type guess from the content itself.
    pub fn fallback_for(content: &str) -> Self {
        Self {
            title: FALLBACK_TITLE.to_string(),
            summary: "Automatic analysis failed; please edit manually.".to_string(),
            tags: vec![GENERIC_TAG.to_string()],
            item_type: if content.starts_with("http") {
                ItemType::Link
            } else {
                ItemType::Note
            },
        }
    }

    /// Apply this analysis onto an item, replacing the analyzed fields and
    /// collapsing any duplicate tags the collaborator returned.
    pub fn apply_to(self, item: &mut VaultItem) {
        item.title = self.title;
        item.summary = self.summary;
        item.tags = self.tags;
        item.item_type = self.item_type;
        item.dedupe_tags();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_guesses_link_type_from_url_prefix() {
        let fb = ContentAnalysis::fallback_for("https://example.com");
        assert_eq!(fb.item_type, ItemType::Link);
        assert_eq!(fb.tags, vec![GENERIC_TAG]);

        let fb = ContentAnalysis::fallback_for("plain text thought");
        assert_eq!(fb.item_type, ItemType::Note);
    }

    #[test]
    fn apply_replaces_fields_and_dedupes_tags() {
        let mut item = VaultItem::new(ItemType::Note, "http://e.com", "old");
        item.summary = "old summary".to_string();

        let analysis = ContentAnalysis {
            title: "Example".to_string(),
            summary: "A site.".to_string(),
            tags: vec!["web".to_string(), "web".to_string(), "tools".to_string()],
            item_type: ItemType::Link,
        };
        analysis.apply_to(&mut item);

        assert_eq!(item.title, "Example");
        assert_eq!(item.summary, "A site.");
        assert_eq!(item.tags, vec!["web", "tools"]);
        assert_eq!(item.item_type, ItemType::Link);
        assert_eq!(item.content, "http://e.com");
    }
}
