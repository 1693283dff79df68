//! Browser bookmark-export parser.
//!
//! Bookmark exports are the classic Netscape format: a loose HTML tree of
//! `<DL>` folder lists, `<DT><H3>` folder headings and `<DT><A>` entries,
//! usually with unclosed tags. Parsing is tolerant (html5ever recovers
//! from malformed markup); extraction walks upward from every anchor
//! rather than descending the folder tree, which survives the broken
//! nesting real exports produce.

use scraper::{ElementRef, Html, Selector};
use tracing::info;

use stash_core::{
    item::{new_item_id, now_millis},
    ItemType, Result, StashError, VaultItem, FALLBACK_BOOKMARK_TAG, FALLBACK_FOLDER_LABEL,
    FALLBACK_TITLE,
};

/// Parse a bookmark HTML export into normalized items.
///
/// One item per navigable anchor; `place:` and `javascript:` pseudo-scheme
/// hrefs are skipped. Each item's tag list is its folder ancestry,
/// root-most folder first, or [`FALLBACK_BOOKMARK_TAG`] when no folder
/// heading exists anywhere above it.
///
/// # Errors
///
/// Returns [`StashError::Format`] only when the document cannot be
/// processed at all; malformed markup is otherwise tolerated.
pub fn parse_bookmarks(raw: &str) -> Result<Vec<VaultItem>> {
    let anchor_sel = selector("a")?;
    let heading_sel = selector("h3")?;

    let doc = Html::parse_document(raw);
    let mut items = Vec::new();

    for anchor in doc.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if href.is_empty() || href.starts_with("place:") || href.starts_with("javascript:") {
            continue;
        }

        let title = collapse_text(&anchor);
        let created_at = anchor
            .value()
            .attr("add_date")
            .and_then(parse_add_date)
            .unwrap_or_else(now_millis);

        let mut tags = folder_ancestry(&anchor, &heading_sel);
        if tags.is_empty() {
            tags.push(FALLBACK_BOOKMARK_TAG.to_string());
        }

        items.push(VaultItem {
            id: new_item_id(),
            item_type: ItemType::Link,
            content: href.to_string(),
            title: if title.is_empty() {
                FALLBACK_TITLE.to_string()
            } else {
                title
            },
            summary: String::new(),
            tags,
            created_at,
        });
    }

    info!(bookmarks = items.len(), "parsed bookmark export");
    Ok(items)
}

/// Walk from the anchor to the document root collecting folder labels,
/// root-most first.
///
/// Each enclosing `<dl>` is one folder level. Its heading sits either
/// inside the parent `<dt>` (modern exports keep the whole
/// `<dt><h3>…</h3><dl>…` block nested) or as the list's preceding element
/// sibling (older exports close the `<dt>` early).
fn folder_ancestry(anchor: &ElementRef, heading_sel: &Selector) -> Vec<String> {
    let mut tags = Vec::new();

    for node in anchor.ancestors() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        if el.value().name() != "dl" {
            continue;
        }

        let parent_dt = node
            .parent()
            .and_then(ElementRef::wrap)
            .filter(|p| p.value().name() == "dt");
        let heading = match parent_dt {
            Some(dt) => dt.select(heading_sel).next(),
            None => node
                .prev_siblings()
                .filter_map(ElementRef::wrap)
                .next()
                .filter(|e| e.value().name() == "h3"),
        };

        if let Some(h3) = heading {
            let label = collapse_text(&h3);
            tags.insert(
                0,
                if label.is_empty() {
                    FALLBACK_FOLDER_LABEL.to_string()
                } else {
                    label
                },
            );
        }
    }

    tags
}

fn collapse_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// `add_date` attributes are Unix seconds. Values whose millisecond
/// conversion would overflow are treated like any other unparseable
/// timestamp.
fn parse_add_date(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| secs.checked_mul(1000))
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| StashError::Format(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A trimmed real-world export: unclosed DTs, nested folders, a
    /// pseudo-scheme entry and a root-level bookmark.
    const EXPORT: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=UTF-8">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
    <DT><H3 ADD_DATE="1700000000">Dev</H3>
    <DL><p>
        <DT><A HREF="https://doc.rust-lang.org" ADD_DATE="1700000100">Rust docs</A>
        <DT><H3>Crates</H3>
        <DL><p>
            <DT><A HREF="https://crates.io" ADD_DATE="1700000200">crates.io</A>
        </DL><p>
    </DL><p>
    <DT><A HREF="place:sort=8">Most visited</A>
    <DT><A HREF="javascript:alert(1)">Bookmarklet</A>
    <DT><A HREF="https://example.com"></A>
</DL><p>
"#;

    #[test]
    fn counts_only_navigable_anchors() {
        let items = parse_bookmarks(EXPORT).unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.item_type == ItemType::Link));
    }

    #[test]
    fn tags_are_folder_ancestry_root_first() {
        let items = parse_bookmarks(EXPORT).unwrap();
        let rust_docs = items
            .iter()
            .find(|i| i.content == "https://doc.rust-lang.org")
            .unwrap();
        assert_eq!(rust_docs.tags, vec!["Dev"]);

        let crates = items
            .iter()
            .find(|i| i.content == "https://crates.io")
            .unwrap();
        assert_eq!(crates.tags, vec!["Dev", "Crates"]);
    }

    #[test]
    fn add_date_seconds_become_milliseconds() {
        let items = parse_bookmarks(EXPORT).unwrap();
        let rust_docs = items
            .iter()
            .find(|i| i.content == "https://doc.rust-lang.org")
            .unwrap();
        assert_eq!(rust_docs.created_at, 1_700_000_100_000);
    }

    #[test]
    fn empty_anchor_text_falls_back_to_untitled() {
        let items = parse_bookmarks(EXPORT).unwrap();
        let untitled = items
            .iter()
            .find(|i| i.content == "https://example.com")
            .unwrap();
        assert_eq!(untitled.title, FALLBACK_TITLE);
    }

    #[test]
    fn no_folder_ancestry_yields_fallback_tag() {
        let raw = r#"<html><body><a href="https://flat.example">Flat</a></body></html>"#;
        let items = parse_bookmarks(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].tags, vec![FALLBACK_BOOKMARK_TAG]);
    }

    #[test]
    fn overflowing_add_date_falls_back_to_now() {
        let before = now_millis();
        let raw = format!(
            r#"<DL><DT><A HREF="https://x.example" ADD_DATE="{}">X</A></DL>"#,
            i64::MAX
        );
        let items = parse_bookmarks(&raw).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].created_at >= before);
    }

    #[test]
    fn missing_add_date_falls_back_to_now() {
        let before = now_millis();
        let raw = r#"<DL><DT><A HREF="https://x.example">X</A></DL>"#;
        let items = parse_bookmarks(raw).unwrap();
        assert!(items[0].created_at >= before);
    }

    #[test]
    fn sibling_heading_form_is_recognized() {
        // Older exports drop the DT wrapper, leaving the H3 as the DL's
        // preceding sibling.
        let raw = r#"
<DL>
    <H3>Old Style</H3>
    <DL>
        <DT><A HREF="https://old.example">Old</A></DT>
    </DL>
</DL>
"#;
        let items = parse_bookmarks(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].tags, vec!["Old Style"]);
    }

    #[test]
    fn malformed_markup_is_tolerated() {
        let raw = "<DL><DT><A HREF=\"https://ok.example\">ok";
        let items = parse_bookmarks(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content, "https://ok.example");
    }

    #[test]
    fn empty_document_produces_no_items() {
        assert!(parse_bookmarks("").unwrap().is_empty());
    }
}
