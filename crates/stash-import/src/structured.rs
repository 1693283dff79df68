//! Structured-export parser.
//!
//! Input is a JSON document with two arrays:
//! - `groups`: `{id, name}`
//! - `sites`: `{id, group_id, name, url, description, notes, created_at}`
//!
//! The document-level shape is enforced strictly; per-record fields are
//! read leniently so one malformed site never aborts the whole parse.

use std::collections::HashMap;

use serde_json::Value;
use tracing::info;

use stash_core::{
    item::{new_item_id, now_millis},
    ItemType, Result, StashError, VaultItem, FALLBACK_GROUP_TAG, FALLBACK_TITLE,
};

use crate::timestamp::parse_millis;

/// Parse a structured JSON export into normalized items.
///
/// Every produced item is a link tagged with its resolved group name, or
/// [`FALLBACK_GROUP_TAG`] when the site references an unknown group.
///
/// # Errors
///
/// Returns [`StashError::Format`] if the document is not valid JSON or
/// either of `groups`/`sites` is missing or not an array.
pub fn parse_structured_export(raw: &str) -> Result<Vec<VaultItem>> {
    let doc: Value = serde_json::from_str(raw)
        .map_err(|e| StashError::Format(format!("not a valid JSON document: {e}")))?;

    let groups = doc
        .get("groups")
        .and_then(Value::as_array)
        .ok_or_else(|| StashError::Format("'groups' is missing or not an array".to_string()))?;
    let sites = doc
        .get("sites")
        .and_then(Value::as_array)
        .ok_or_else(|| StashError::Format("'sites' is missing or not an array".to_string()))?;

    let group_names: HashMap<i64, &str> = groups
        .iter()
        .filter_map(|g| Some((g.get("id")?.as_i64()?, g.get("name")?.as_str()?)))
        .collect();

    let items: Vec<VaultItem> = sites
        .iter()
        .map(|site| site_to_item(site, &group_names))
        .collect();

    info!(
        sites = items.len(),
        groups = group_names.len(),
        "parsed structured export"
    );
    Ok(items)
}

fn site_to_item(site: &Value, group_names: &HashMap<i64, &str>) -> VaultItem {
    let group_name = site
        .get("group_id")
        .and_then(Value::as_i64)
        .and_then(|id| group_names.get(&id).copied())
        .unwrap_or(FALLBACK_GROUP_TAG);

    let title = site
        .get("name")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_TITLE);

    // Description and notes merge into the summary, blank values skipped.
    let summary = [site.get("description"), site.get("notes")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let created_at = match site.get("created_at") {
        Some(Value::String(s)) => parse_millis(s).unwrap_or_else(now_millis),
        // Some exports carry epoch milliseconds directly.
        Some(Value::Number(n)) => n.as_i64().unwrap_or_else(now_millis),
        _ => now_millis(),
    };

    VaultItem {
        id: new_item_id(),
        item_type: ItemType::Link,
        content: site
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        title: title.to_string(),
        summary,
        tags: vec![group_name.to_string()],
        created_at,
    }
}
