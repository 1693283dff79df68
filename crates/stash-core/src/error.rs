//! Error types for Stash.

use thiserror::Error;

/// Top-level result type for Stash operations.
pub type Result<T> = std::result::Result<T, StashError>;

/// Top-level error type for Stash.
///
/// Propagation policy: [`Format`](StashError::Format) and
/// [`UnsupportedFormat`](StashError::UnsupportedFormat) abort an import
/// before anything is written. [`Transport`](StashError::Transport) during
/// a chunked write aborts the remaining chunks only; chunks already
/// written stay committed. [`Analysis`](StashError::Analysis) is always
/// recovered close to the call site and never aborts a sweep.
#[derive(Debug, Error)]
pub enum StashError {
    #[error("format error: {0}")]
    Format(String),

    #[error("unsupported import format '{extension}': only .json (structured export) and .html (browser bookmarks) are accepted")]
    UnsupportedFormat { extension: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("analysis failed: {0}")]
    Analysis(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}
