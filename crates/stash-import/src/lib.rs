//! # stash-import
//!
//! Import side of the Stash pipeline: parses heterogeneous export
//! formats into canonical [`VaultItem`]s, detects duplicates against the
//! existing corpus, and models the user-mediated conflict-resolution
//! session as an explicit state machine.
//!
//! Two formats are accepted:
//! - `.json` — structured export with `groups` and `sites` arrays
//! - `.html` — browser bookmark export (nested folder markup)
//!
//! Parsers are pure: text in, items out. Nothing here touches a store.

pub mod bookmarks;
pub mod conflict;
pub mod dedup;
pub mod structured;

mod timestamp;

use std::path::Path;

use stash_core::{Result, StashError, VaultItem};

pub use bookmarks::parse_bookmarks;
pub use conflict::{ConflictSession, Resolution, ResolveOutcome, SessionSummary};
pub use dedup::{partition, ConflictEntry, ImportBatch};
pub use structured::parse_structured_export;

/// Accepted import formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    /// Structured JSON export (`groups` + `sites`).
    StructuredJson,
    /// Browser bookmark HTML export.
    BookmarksHtml,
}

/// Route a file to a parser by declared MIME type or filename extension.
///
/// # Errors
///
/// Returns [`StashError::UnsupportedFormat`] for anything that is neither
/// JSON nor HTML; the message names the two accepted extensions.
pub fn detect_format(file_name: &str, mime: Option<&str>) -> Result<ImportFormat> {
    if mime == Some("application/json") {
        return Ok(ImportFormat::StructuredJson);
    }
    if mime == Some("text/html") {
        return Ok(ImportFormat::BookmarksHtml);
    }

    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => Ok(ImportFormat::StructuredJson),
        Some("html") => Ok(ImportFormat::BookmarksHtml),
        other => Err(StashError::UnsupportedFormat {
            extension: other.unwrap_or("none").to_string(),
        }),
    }
}

/// Parse raw file text into normalized items, dispatching on format.
///
/// # Errors
///
/// Returns [`StashError::UnsupportedFormat`] for unknown formats and
/// [`StashError::Format`] when the chosen parser rejects the document.
pub fn parse_import(file_name: &str, mime: Option<&str>, raw: &str) -> Result<Vec<VaultItem>> {
    match detect_format(file_name, mime)? {
        ImportFormat::StructuredJson => parse_structured_export(raw),
        ImportFormat::BookmarksHtml => parse_bookmarks(raw),
    }
}
