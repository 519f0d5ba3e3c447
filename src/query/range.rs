//! Range queries over numeric and date fields.

use std::fmt::{self, Display};

use chrono::{DateTime, Utc};

/// Bound type for range queries.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound<T> {
    /// Inclusive bound.
    Included(T),
    /// Exclusive bound.
    Excluded(T),
    /// Unbounded (no limit).
    Unbounded,
}

impl<T: PartialOrd> Bound<T> {
    /// Check if a value satisfies this bound as a lower bound.
    pub fn contains_lower(&self, value: &T) -> bool {
        match self {
            Bound::Included(bound) => value >= bound,
            Bound::Excluded(bound) => value > bound,
            Bound::Unbounded => true,
        }
    }

    /// Check if a value satisfies this bound as an upper bound.
    pub fn contains_upper(&self, value: &T) -> bool {
        match self {
            Bound::Included(bound) => value <= bound,
            Bound::Excluded(bound) => value < bound,
            Bound::Unbounded => true,
        }
    }
}

/// A query that matches documents whose field value lies within a range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery<T> {
    /// The field to search in.
    field: String,
    /// Lower bound of the range.
    lower_bound: Bound<T>,
    /// Upper bound of the range.
    upper_bound: Bound<T>,
}

/// Range over numeric fields (integers are compared as f64).
pub type NumericRangeQuery = RangeQuery<f64>;

/// Range over date/time fields.
pub type DateRangeQuery = RangeQuery<DateTime<Utc>>;

impl<T: PartialOrd + Clone> RangeQuery<T> {
    /// Create a range query with custom bound types.
    pub fn with_bounds<S: Into<String>>(field: S, lower_bound: Bound<T>, upper_bound: Bound<T>) -> Self {
        RangeQuery {
            field: field.into(),
            lower_bound,
            upper_bound,
        }
    }

    /// Range matching exactly one value.
    pub fn exact<S: Into<String>>(field: S, value: T) -> Self {
        Self::with_bounds(field, Bound::Included(value.clone()), Bound::Included(value))
    }

    /// Create a range query for values greater than or equal to the given value.
    pub fn greater_than_or_equal<S: Into<String>>(field: S, value: T) -> Self {
        Self::with_bounds(field, Bound::Included(value), Bound::Unbounded)
    }

    /// Create a range query for values greater than the given value.
    pub fn greater_than<S: Into<String>>(field: S, value: T) -> Self {
        Self::with_bounds(field, Bound::Excluded(value), Bound::Unbounded)
    }

    /// Create a range query for values less than or equal to the given value.
    pub fn less_than_or_equal<S: Into<String>>(field: S, value: T) -> Self {
        Self::with_bounds(field, Bound::Unbounded, Bound::Included(value))
    }

    /// Create a range query for values less than the given value.
    pub fn less_than<S: Into<String>>(field: S, value: T) -> Self {
        Self::with_bounds(field, Bound::Unbounded, Bound::Excluded(value))
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the lower bound.
    pub fn lower_bound(&self) -> &Bound<T> {
        &self.lower_bound
    }

    /// Get the upper bound.
    pub fn upper_bound(&self) -> &Bound<T> {
        &self.upper_bound
    }

    /// Check if a value is within this range.
    pub fn contains(&self, value: &T) -> bool {
        self.lower_bound.contains_lower(value) && self.upper_bound.contains_upper(value)
    }
}

impl<T: Display> RangeQuery<T> {
    /// Lucene-style range description, e.g. `age:[45 TO *}`.
    pub fn description(&self) -> String {
        format!(
            "{}:{}",
            self.field,
            DisplayRange(&self.lower_bound, &self.upper_bound)
        )
    }
}

struct DisplayRange<'a, T>(&'a Bound<T>, &'a Bound<T>);

impl<T: Display> Display for DisplayRange<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Bound::Included(v) => write!(f, "[{v}")?,
            Bound::Excluded(v) => write!(f, "{{{v}")?,
            Bound::Unbounded => write!(f, "[*")?,
        }
        write!(f, " TO ")?;
        match self.1 {
            Bound::Included(v) => write!(f, "{v}]"),
            Bound::Excluded(v) => write!(f, "{v}}}"),
            Bound::Unbounded => write!(f, "*]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_numeric_range_contains() {
        let query = NumericRangeQuery::greater_than_or_equal("age", 45.0);

        assert!(query.contains(&45.0));
        assert!(query.contains(&70.0));
        assert!(!query.contains(&44.9));

        let query = NumericRangeQuery::less_than("age", 18.0);
        assert!(query.contains(&17.0));
        assert!(!query.contains(&18.0));
    }

    #[test]
    fn test_exact_range() {
        let query = NumericRangeQuery::exact("age", 30.0);

        assert!(query.contains(&30.0));
        assert!(!query.contains(&31.0));
        assert_eq!(query.description(), "age:[30 TO 30]");
    }

    #[test]
    fn test_date_range_contains() {
        let cutoff = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let query = DateRangeQuery::greater_than("created_at", cutoff);

        assert!(query.contains(&Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap()));
        assert!(!query.contains(&cutoff));
    }

    #[test]
    fn test_range_description() {
        assert_eq!(
            NumericRangeQuery::greater_than("age", 45.0).description(),
            "age:{45 TO *]"
        );
        assert_eq!(
            NumericRangeQuery::less_than_or_equal("age", 18.0).description(),
            "age:[* TO 18]"
        );
    }
}
