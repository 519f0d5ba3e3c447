//! Turns operator input into a paginated, faceted search request.

use crate::error::{Result, UserSearchError};
use crate::search::{FacetRequest, FieldKind, Projection, RangeFacet, SearchRequest};

pub use crate::search::DEFAULT_PAGE_SIZE;

/// Name of the categorical gender facet.
pub const GENDER_FACET: &str = "gender";

/// Name of the age bucket facet.
pub const AGE_GROUP_FACET: &str = "age_group";

const GENDER_FACET_SIZE: usize = 2;

const AGE_GROUP_LABELS: [&str; 5] = ["teenager", "young-adult", "adult", "senior-adult", "senior"];
const AGE_GROUP_BOUNDARIES: [f64; 4] = [18.0, 25.0, 45.0, 64.0];

/// Builds the search request for one line of operator input.
#[derive(Debug, Clone)]
pub struct QueryPlanner {
    page_size: usize,
}

impl Default for QueryPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryPlanner {
    pub fn new() -> Self {
        QueryPlanner {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(UserSearchError::invalid_argument(
                "page size must be greater than zero",
            ));
        }
        Ok(QueryPlanner { page_size })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The fixed columns every hit returns.
    pub fn projection() -> Projection {
        Projection::new()
            .with_field("id", "#", FieldKind::Integer)
            .with_field("firstname", "First Name", FieldKind::Text)
            .with_field("lastname", "Last Name", FieldKind::Text)
            .with_field("age", "Age", FieldKind::Integer)
    }

    /// Age buckets covering the whole real line.
    pub fn age_groups() -> Result<RangeFacet> {
        RangeFacet::from_boundaries("age", &AGE_GROUP_LABELS, &AGE_GROUP_BOUNDARIES)
    }

    /// Build the request for `raw`. The text is passed through untouched;
    /// an empty string is left to the index to interpret.
    pub fn plan(&self, raw: &str) -> Result<SearchRequest> {
        let mut request = SearchRequest::new(raw)
            .with_page(0, self.page_size)?
            .with_projection(Self::projection());

        request.add_facet(
            GENDER_FACET,
            FacetRequest::terms("gender", GENDER_FACET_SIZE),
        )?;
        request.add_facet(AGE_GROUP_FACET, FacetRequest::NumericRange(Self::age_groups()?))?;

        log::debug!("Planned request for {raw:?}");
        Ok(request)
    }
}
