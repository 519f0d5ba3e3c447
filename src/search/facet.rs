//! Faceted search: facet definitions, collection and results.
//!
//! Two facet kinds are supported:
//! - a terms facet reporting the most frequent values of a field, and
//! - a numeric-range facet partitioning a numeric field into labeled,
//!   ordered, disjoint half-open ranges `[min, max)`.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analysis::Analyzer;
use crate::document::{Document, FieldValue};
use crate::error::{Result, UserSearchError};

/// A range definition for faceting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetRange {
    /// Range label
    pub label: String,
    /// Minimum value (inclusive), `None` for negative infinity
    pub min: Option<f64>,
    /// Maximum value (exclusive), `None` for positive infinity
    pub max: Option<f64>,
}

impl FacetRange {
    /// Create a new facet range.
    pub fn new<S: Into<String>>(label: S, min: Option<f64>, max: Option<f64>) -> Self {
        FacetRange {
            label: label.into(),
            min,
            max,
        }
    }

    /// Check if a value falls within this range.
    pub fn contains(&self, value: f64) -> bool {
        let min_ok = self.min.is_none_or(|min| value >= min);
        let max_ok = self.max.is_none_or(|max| value < max);
        min_ok && max_ok
    }
}

/// Terms facet: top `size` values of a field by frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsFacet {
    /// Field name
    pub field: String,
    /// Number of values to report
    pub size: usize,
}

/// Range faceting for numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeFacet {
    /// Field name
    field: String,
    /// Range definitions, ordered and pairwise disjoint
    ranges: Vec<FacetRange>,
}

impl RangeFacet {
    /// Create a new range facet.
    ///
    /// Ranges must be non-empty intervals listed in ascending order without
    /// overlap; only the first range may be open below and only the last
    /// may be open above. Labels must be unique.
    pub fn new<S: Into<String>>(field: S, ranges: Vec<FacetRange>) -> Result<Self> {
        let field = field.into();
        if ranges.is_empty() {
            return Err(UserSearchError::facet(format!(
                "Range facet on '{field}' has no ranges"
            )));
        }

        for (i, range) in ranges.iter().enumerate() {
            if let (Some(min), Some(max)) = (range.min, range.max)
                && min >= max
            {
                return Err(UserSearchError::facet(format!(
                    "Range '{}' is empty: {min} >= {max}",
                    range.label
                )));
            }
            if ranges[..i].iter().any(|r| r.label == range.label) {
                return Err(UserSearchError::facet(format!(
                    "Duplicate range label '{}'",
                    range.label
                )));
            }
        }

        for pair in ranges.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            match (prev.max, next.min) {
                (Some(max), Some(min)) if max <= min => {}
                _ => {
                    return Err(UserSearchError::facet(format!(
                        "Ranges '{}' and '{}' overlap or are out of order",
                        prev.label, next.label
                    )));
                }
            }
        }

        Ok(RangeFacet { field, ranges })
    }

    /// Build contiguous ranges from ascending cut points.
    ///
    /// `n` boundaries produce `n + 1` ranges: `(-inf, b0)`, `[b0, b1)`, ...,
    /// `[b(n-1), +inf)`, so the result always covers the whole real line.
    pub fn from_boundaries<S: Into<String>>(
        field: S,
        labels: &[&str],
        boundaries: &[f64],
    ) -> Result<Self> {
        if labels.len() != boundaries.len() + 1 {
            return Err(UserSearchError::facet(format!(
                "{} boundaries need {} labels, got {}",
                boundaries.len(),
                boundaries.len() + 1,
                labels.len()
            )));
        }
        if boundaries.iter().any(|b| !b.is_finite()) {
            return Err(UserSearchError::facet("Range boundaries must be finite"));
        }

        let ranges = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let min = i.checked_sub(1).map(|prev| boundaries[prev]);
                let max = boundaries.get(i).copied();
                FacetRange::new(*label, min, max)
            })
            .collect();

        RangeFacet::new(field, ranges)
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the ranges in declared order.
    pub fn ranges(&self) -> &[FacetRange] {
        &self.ranges
    }

    /// Whether every real number falls into exactly one range.
    pub fn is_exhaustive(&self) -> bool {
        let (Some(first), Some(last)) = (self.ranges.first(), self.ranges.last()) else {
            return false;
        };

        first.min.is_none()
            && last.max.is_none()
            && self
                .ranges
                .windows(2)
                .all(|pair| pair[0].max.is_some() && pair[0].max == pair[1].min)
    }

    /// Find the range containing a value.
    pub fn range_for(&self, value: f64) -> Option<&FacetRange> {
        self.ranges.iter().find(|range| range.contains(value))
    }
}

/// A facet attached to a search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FacetRequest {
    /// Most frequent values of a field.
    Terms(TermsFacet),
    /// Numeric ranges over a field.
    NumericRange(RangeFacet),
}

impl FacetRequest {
    /// Terms facet over `field` reporting the top `size` values.
    pub fn terms<S: Into<String>>(field: S, size: usize) -> Self {
        FacetRequest::Terms(TermsFacet {
            field: field.into(),
            size,
        })
    }

    /// Get the faceted field.
    pub fn field(&self) -> &str {
        match self {
            FacetRequest::Terms(facet) => &facet.field,
            FacetRequest::NumericRange(facet) => facet.field(),
        }
    }
}

/// Count of one term in a terms facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermCount {
    /// The term.
    pub term: String,
    /// Number of matching documents with this term.
    pub count: u64,
}

/// Count of one range in a numeric-range facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeCount {
    /// Range label.
    pub label: String,
    /// Minimum value (inclusive).
    pub min: Option<f64>,
    /// Maximum value (exclusive).
    pub max: Option<f64>,
    /// Number of matching documents in this range.
    pub count: u64,
}

/// Result of one facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetResult {
    /// The faceted field.
    pub field: String,
    /// Total number of values counted.
    pub total: u64,
    /// Matching documents without a usable value for the field.
    pub missing: u64,
    /// Values counted but not reported (beyond top-K, or outside all ranges).
    pub other: u64,
    /// Term counts (terms facets only), by count descending.
    pub terms: Vec<TermCount>,
    /// Range counts (range facets only), in declared order.
    pub ranges: Vec<RangeCount>,
}

/// Facet collector that accumulates counts for one facet request.
#[derive(Debug)]
pub struct FacetCollector<'a> {
    request: &'a FacetRequest,
    term_counts: HashMap<String, u64>,
    range_counts: Vec<u64>,
    missing: u64,
    out_of_range: u64,
}

impl<'a> FacetCollector<'a> {
    /// Create a new facet collector.
    pub fn new(request: &'a FacetRequest) -> Self {
        let range_counts = match request {
            FacetRequest::NumericRange(facet) => vec![0; facet.ranges().len()],
            FacetRequest::Terms(_) => Vec::new(),
        };

        FacetCollector {
            request,
            term_counts: HashMap::new(),
            range_counts,
            missing: 0,
            out_of_range: 0,
        }
    }

    /// Add a matching document to the facet counts.
    pub fn collect_doc(&mut self, doc: &Document, analyzer: &dyn Analyzer) {
        let value = doc
            .get_field(self.request.field())
            .filter(|v| !matches!(v, FieldValue::Null));

        match self.request {
            FacetRequest::Terms(_) => {
                let mut terms = match value {
                    Some(FieldValue::Text(text)) => analyzer.terms(text),
                    Some(other) => vec![other.to_string()],
                    None => Vec::new(),
                };
                terms.sort();
                terms.dedup();

                if terms.is_empty() {
                    self.missing += 1;
                }
                for term in terms {
                    *self.term_counts.entry(term).or_insert(0) += 1;
                }
            }
            FacetRequest::NumericRange(facet) => match value.and_then(|v| v.as_f64()) {
                Some(number) => match facet.ranges().iter().position(|r| r.contains(number)) {
                    Some(idx) => self.range_counts[idx] += 1,
                    None => self.out_of_range += 1,
                },
                None => self.missing += 1,
            },
        }
    }

    /// Finalize and return the collected facet counts.
    pub fn finalize(self) -> FacetResult {
        let field = self.request.field().to_string();

        match self.request {
            FacetRequest::Terms(facet) => {
                let total: u64 = self.term_counts.values().sum();
                let mut terms: Vec<TermCount> = self
                    .term_counts
                    .into_iter()
                    .map(|(term, count)| TermCount { term, count })
                    .collect();
                terms.sort_by(|a, b| match b.count.cmp(&a.count) {
                    Ordering::Equal => a.term.cmp(&b.term),
                    ordering => ordering,
                });
                terms.truncate(facet.size);
                let reported: u64 = terms.iter().map(|t| t.count).sum();

                FacetResult {
                    field,
                    total,
                    missing: self.missing,
                    other: total - reported,
                    terms,
                    ranges: Vec::new(),
                }
            }
            FacetRequest::NumericRange(facet) => {
                let ranges: Vec<RangeCount> = facet
                    .ranges()
                    .iter()
                    .zip(self.range_counts)
                    .map(|(range, count)| RangeCount {
                        label: range.label.clone(),
                        min: range.min,
                        max: range.max,
                        count,
                    })
                    .collect();
                let in_range: u64 = ranges.iter().map(|r| r.count).sum();

                FacetResult {
                    field,
                    total: in_range + self.out_of_range,
                    missing: self.missing,
                    other: self.out_of_range,
                    terms: Vec::new(),
                    ranges,
                }
            }
        }
    }
}
