//! Boolean query implementation for combining multiple queries.

use crate::query::query::Query;

/// Occurrence requirements for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    /// The clause must match (`+clause`).
    Must,
    /// The clause should match (plain clause).
    Should,
    /// The clause must not match (`-clause`).
    MustNot,
}

/// A clause in a boolean query.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanClause {
    /// The query for this clause.
    pub query: Query,
    /// The occurrence requirement.
    pub occur: Occur,
}

impl BooleanClause {
    /// Create a new boolean clause.
    pub fn new(query: Query, occur: Occur) -> Self {
        BooleanClause { query, occur }
    }
}

/// A boolean query that combines multiple queries with boolean logic.
///
/// Matching rules:
/// - with at least one MUST clause, every MUST clause has to match and
///   SHOULD clauses only contribute score;
/// - without MUST clauses, at least one SHOULD clause has to match;
/// - with only MUST_NOT clauses, every document not excluded matches.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BooleanQuery {
    /// The clauses in this boolean query.
    clauses: Vec<BooleanClause>,
}

impl BooleanQuery {
    /// Create a new empty boolean query.
    pub fn new() -> Self {
        BooleanQuery {
            clauses: Vec::new(),
        }
    }

    /// Add a clause to this boolean query.
    pub fn add_clause(&mut self, clause: BooleanClause) {
        self.clauses.push(clause);
    }

    /// Get the clauses.
    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    /// Iterate the queries of one occurrence kind.
    pub fn clauses_with(&self, occur: Occur) -> impl Iterator<Item = &Query> {
        self.clauses
            .iter()
            .filter(move |c| c.occur == occur)
            .map(|c| &c.query)
    }

    /// Check if this boolean query has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Human-readable description, e.g. `(+gender:female -age:[* TO 18})`.
    pub fn description(&self) -> String {
        let parts: Vec<String> = self
            .clauses
            .iter()
            .map(|clause| {
                let prefix = match clause.occur {
                    Occur::Must => "+",
                    Occur::MustNot => "-",
                    Occur::Should => "",
                };
                format!("{prefix}{}", clause.query.description())
            })
            .collect();

        format!("({})", parts.join(" "))
    }
}

/// Builder for creating boolean queries.
#[derive(Debug, Default)]
pub struct BooleanQueryBuilder {
    query: BooleanQuery,
}

impl BooleanQueryBuilder {
    /// Create a new boolean query builder.
    pub fn new() -> Self {
        BooleanQueryBuilder {
            query: BooleanQuery::new(),
        }
    }

    /// Add a MUST clause.
    pub fn must(mut self, query: Query) -> Self {
        self.query.add_clause(BooleanClause::new(query, Occur::Must));
        self
    }

    /// Add a SHOULD clause.
    pub fn should(mut self, query: Query) -> Self {
        self.query
            .add_clause(BooleanClause::new(query, Occur::Should));
        self
    }

    /// Add a MUST_NOT clause.
    pub fn must_not(mut self, query: Query) -> Self {
        self.query
            .add_clause(BooleanClause::new(query, Occur::MustNot));
        self
    }

    /// Add a clause with an explicit occurrence.
    pub fn clause(mut self, query: Query, occur: Occur) -> Self {
        self.query.add_clause(BooleanClause::new(query, occur));
        self
    }

    /// Build the boolean query.
    pub fn build(self) -> BooleanQuery {
        self.query
    }
}
