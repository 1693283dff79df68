//! Chunked batch writer.
//!
//! Large writes are split into fixed-size chunks persisted strictly in
//! sequence: chunk *n+1* is not issued until chunk *n* has resolved. This
//! bounds the outstanding payload rather than maximizing throughput. A
//! failing chunk aborts the rest; chunks already written stay committed
//! (no compensating rollback — accepted partial-success semantics).

use tracing::{debug, warn};

use stash_core::{Result, VaultItem};

use crate::Store;

/// Reference chunk size for corpus writes.
pub const WRITE_CHUNK_SIZE: usize = 50;

/// Persist `items` through `store` in chunks of `chunk_size`.
///
/// Returns the number of chunks written. For `k` items this issues
/// exactly `ceil(k / chunk_size)` batch calls, each of size
/// `<= chunk_size`.
///
/// # Errors
///
/// Propagates the first failing chunk's error; later chunks are never
/// issued.
pub async fn write_chunked(
    store: &dyn Store,
    items: &[VaultItem],
    chunk_size: usize,
) -> Result<usize> {
    let chunk_size = chunk_size.max(1);
    let mut written = 0;

    for chunk in items.chunks(chunk_size) {
        if let Err(e) = store.put_batch(chunk).await {
            warn!(
                chunks_written = written,
                remaining = items.len() - written * chunk_size,
                "chunked write aborted"
            );
            return Err(e);
        }
        written += 1;
        debug!(chunk = written, size = chunk.len(), "chunk persisted");
    }

    Ok(written)
}
