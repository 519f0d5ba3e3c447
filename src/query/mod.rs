//! Query system: the query tree and the query-string parser.

pub mod boolean;
pub mod parser;
#[allow(clippy::module_inception)]
pub mod query;
pub mod range;

pub use self::boolean::{BooleanClause, BooleanQuery, BooleanQueryBuilder, Occur};
pub use self::parser::QueryParser;
pub use self::query::Query;
pub use self::range::{Bound, DateRangeQuery, NumericRangeQuery, RangeQuery};
