//! # stash-core
//!
//! Core types for the Stash content vault.
//!
//! This crate defines the foundational types used across all other Stash
//! crates:
//! - [`VaultItem`] — the canonical vault record (link, note or snippet)
//! - [`ItemType`] — the three item kinds
//! - [`ContentAnalysis`] — the output contract of the analysis collaborator
//! - Error hierarchy ([`StashError`], [`Result`])
//! - Fallback literals shared by the parsers and the enrichment pass

pub mod analysis;
pub mod error;
pub mod item;

pub use analysis::ContentAnalysis;
pub use error::{Result, StashError};
pub use item::{ItemType, VaultItem};

/// Title assigned when an import record or analysis carries no usable name.
pub const FALLBACK_TITLE: &str = "Untitled";

/// Tag assigned to structured-export sites whose group id is unknown.
pub const FALLBACK_GROUP_TAG: &str = "Imported";

/// Tag assigned to bookmarks with no folder ancestry at all.
pub const FALLBACK_BOOKMARK_TAG: &str = "Imported Bookmarks";

/// Label used for a bookmark folder whose heading has no text.
pub const FALLBACK_FOLDER_LABEL: &str = "Folder";

/// Generic placeholder tag; its presence marks an item as poorly annotated.
pub const GENERIC_TAG: &str = "Uncategorized";
