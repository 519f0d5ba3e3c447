//! The query tree produced by the query-string parser.

use crate::query::boolean::BooleanQuery;
use crate::query::range::{DateRangeQuery, NumericRangeQuery};

/// A parsed search query.
///
/// Text inside `Match` and `Phrase` is kept as typed by the user; the index
/// runs it through its analyzer when the query is executed. A `None` field
/// targets the composite `_all` field.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Matches no document.
    MatchNone,
    /// Matches documents containing any of the analyzed terms.
    Match {
        /// Target field, `None` for all text fields.
        field: Option<String>,
        /// Raw text to analyze.
        text: String,
    },
    /// Matches documents containing the analyzed terms consecutively.
    Phrase {
        /// Target field, `None` for all text fields.
        field: Option<String>,
        /// Raw phrase text to analyze.
        text: String,
    },
    /// Numeric range over a numeric field.
    NumericRange(NumericRangeQuery),
    /// Date range over a date field.
    DateRange(DateRangeQuery),
    /// Boolean combination of sub-queries.
    Boolean(BooleanQuery),
}

impl Query {
    /// Match query against a specific field.
    pub fn field_match<S: Into<String>, T: Into<String>>(field: S, text: T) -> Self {
        Query::Match {
            field: Some(field.into()),
            text: text.into(),
        }
    }

    /// Match query against all text fields.
    pub fn text_match<T: Into<String>>(text: T) -> Self {
        Query::Match {
            field: None,
            text: text.into(),
        }
    }

    /// Get the field name this query searches in, if applicable.
    pub fn field(&self) -> Option<&str> {
        match self {
            Query::Match { field, .. } | Query::Phrase { field, .. } => field.as_deref(),
            Query::NumericRange(q) => Some(q.field()),
            Query::DateRange(q) => Some(q.field()),
            _ => None,
        }
    }

    /// Get a human-readable description of this query.
    pub fn description(&self) -> String {
        match self {
            Query::MatchNone => "()".to_string(),
            Query::Match { field, text } => match field {
                Some(field) => format!("{field}:{text}"),
                None => text.clone(),
            },
            Query::Phrase { field, text } => match field {
                Some(field) => format!("{field}:\"{text}\""),
                None => format!("\"{text}\""),
            },
            Query::NumericRange(q) => q.description(),
            Query::DateRange(q) => q.description(),
            Query::Boolean(q) => q.description(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_description() {
        assert_eq!(Query::field_match("gender", "female").description(), "gender:female");
        assert_eq!(Query::text_match("jane").description(), "jane");
        assert_eq!(
            Query::Phrase {
                field: Some("lastname".into()),
                text: "van dyke".into()
            }
            .description(),
            "lastname:\"van dyke\""
        );
        assert_eq!(Query::MatchNone.description(), "()");
    }

    #[test]
    fn test_query_field() {
        assert_eq!(Query::field_match("gender", "male").field(), Some("gender"));
        assert_eq!(Query::text_match("male").field(), None);
        assert_eq!(
            Query::NumericRange(NumericRangeQuery::less_than("age", 18.0)).field(),
            Some("age")
        );
    }
}
