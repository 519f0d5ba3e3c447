//! The index boundary: batched writes and faceted search.
//!
//! [`SearchIndex`] is everything the rest of the crate needs from a search
//! engine. [`MemoryIndex`] is the in-process implementation the demo runs
//! on; tests substitute recording doubles.

pub mod batch;
pub mod memory;

pub use self::batch::{Batch, BatchOperation};
pub use self::memory::MemoryIndex;

use crate::error::Result;
use crate::search::{SearchRequest, SearchResult};

/// Trait for indexes that accept batched writes and answer search requests.
pub trait SearchIndex {
    /// Create an empty pending-write batch.
    fn new_batch(&self) -> Batch {
        Batch::new()
    }

    /// Atomically apply every staged write of the batch.
    ///
    /// On error no write of the batch is applied.
    fn submit(&mut self, batch: Batch) -> Result<()>;

    /// Execute a search request.
    fn search(&self, request: &SearchRequest) -> Result<SearchResult>;

    /// Number of documents in the index.
    fn doc_count(&self) -> u64;
}
