//! # usersearch
//!
//! An interactive faceted search demo over synthetic user records.
//!
//! ## Features
//!
//! - Synthetic users with calendar-correct ages
//! - Batched loading into an in-memory inverted index
//! - Query strings with field terms, phrases, `+`/`-` clauses and ranges
//! - Terms and numeric-range facets
//! - Typed field projection rendered as a text table

pub mod analysis;
pub mod cli;
pub mod document;
pub mod error;
pub mod index;
pub mod loader;
pub mod planner;
pub mod query;
pub mod search;
pub mod user;

pub mod prelude {
    pub use crate::error::{Result, UserSearchError};
    pub use crate::index::{Batch, MemoryIndex, SearchIndex};
    pub use crate::loader::{BatchLoader, LoadReport};
    pub use crate::planner::QueryPlanner;
    pub use crate::search::{SearchRequest, SearchResult};
    pub use crate::user::{Gender, Indexable, RecordFactory, UserRecord};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
