//! Search requests and results exchanged with a [`SearchIndex`].
//!
//! [`SearchIndex`]: crate::index::SearchIndex

pub mod facet;
pub mod projection;

pub use self::facet::{
    FacetCollector, FacetRange, FacetRequest, FacetResult, RangeCount, RangeFacet, TermCount,
    TermsFacet,
};
pub use self::projection::{FieldKind, ProjectedField, Projection};

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::document::FieldValue;
use crate::error::{Result, UserSearchError};

/// Default page length when none is given.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Search request: query string, pagination window, projection and facets.
///
/// Facet names are unique within a request and the page size is never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query string in the index's query syntax.
    query: String,
    /// Number of ranked hits to skip.
    offset: usize,
    /// Maximum number of hits to return.
    size: usize,
    /// Fields returned with every hit.
    projection: Projection,
    /// Named facets.
    facets: BTreeMap<String, FacetRequest>,
}

impl SearchRequest {
    /// Create a new search request for the first page.
    pub fn new<S: Into<String>>(query: S) -> Self {
        SearchRequest {
            query: query.into(),
            offset: 0,
            size: DEFAULT_PAGE_SIZE,
            projection: Projection::new(),
            facets: BTreeMap::new(),
        }
    }

    /// Set the pagination window.
    pub fn with_page(mut self, offset: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(UserSearchError::invalid_argument(
                "page size must be greater than zero",
            ));
        }
        self.offset = offset;
        self.size = size;
        Ok(self)
    }

    /// Set the field projection.
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Attach a named facet.
    pub fn add_facet<S: Into<String>>(&mut self, name: S, facet: FacetRequest) -> Result<()> {
        let name = name.into();
        if self.facets.contains_key(&name) {
            return Err(UserSearchError::facet(format!(
                "Facet '{name}' is already defined"
            )));
        }
        self.facets.insert(name, facet);
        Ok(())
    }

    /// Get the query string.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Get the offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get the page size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the projection.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Get the facets by name.
    pub fn facets(&self) -> &BTreeMap<String, FacetRequest> {
        &self.facets
    }
}

/// A search hit: document id, score and projected fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// The document ID.
    pub id: String,
    /// The relevance score.
    pub score: f32,
    /// The projected document fields.
    pub fields: HashMap<String, FieldValue>,
}

/// Search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The search hits of the requested page, best first.
    pub hits: Vec<Hit>,
    /// Total number of matching documents.
    pub total_hits: u64,
    /// Maximum score among all matches.
    pub max_score: f32,
    /// Time spent searching.
    pub took: Duration,
    /// Facet results by facet name.
    pub facets: BTreeMap<String, FacetResult>,
}

impl SearchResult {
    /// An empty result.
    pub fn empty() -> Self {
        SearchResult {
            hits: Vec::new(),
            total_hits: 0,
            max_score: 0.0,
            took: Duration::ZERO,
            facets: BTreeMap::new(),
        }
    }
}
