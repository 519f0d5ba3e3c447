//! In-memory search index.
//!
//! Documents are kept in insertion order. Text fields are analyzed at index
//! time; their tokens are stored per field (for phrase matching) and in a
//! composite [`ALL_FIELD`] used by unqualified terms. Postings map each
//! `(field, term)` pair to the set of document ordinals containing it and
//! provide document frequencies for scoring.

use std::cmp::Ordering;
use std::fmt;
use std::time::Instant;

use ahash::{AHashMap, AHashSet};

use crate::analysis::{Analyzer, StandardAnalyzer};
use crate::document::{Document, FieldValue};
use crate::error::{Result, UserSearchError};
use crate::index::SearchIndex;
use crate::index::batch::Batch;
use crate::query::{BooleanQuery, Occur, Query, QueryParser};
use crate::search::{FacetCollector, Hit, SearchRequest, SearchResult};

/// Name of the composite field holding the tokens of every text field.
pub const ALL_FIELD: &str = "_all";

/// Score contributed by clauses that do not rank (ranges, pure exclusions).
const CONSTANT_SCORE: f32 = 1.0;

#[derive(Debug)]
struct StoredDocument {
    id: String,
    document: Document,
    /// Analyzed tokens per text field, plus [`ALL_FIELD`].
    tokens: AHashMap<String, Vec<String>>,
}

/// An index held entirely in process memory.
pub struct MemoryIndex {
    analyzer: Box<dyn Analyzer>,
    parser: QueryParser,
    docs: Vec<StoredDocument>,
    ordinals: AHashMap<String, usize>,
    postings: AHashMap<String, AHashMap<String, AHashSet<usize>>>,
}

impl fmt::Debug for MemoryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryIndex")
            .field("analyzer", &self.analyzer.name())
            .field("doc_count", &self.docs.len())
            .finish()
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIndex {
    /// Create a new empty index with the standard analyzer.
    pub fn new() -> Self {
        Self::with_analyzer(Box::new(StandardAnalyzer::new()))
    }

    /// Create a new empty index with a custom analyzer.
    pub fn with_analyzer(analyzer: Box<dyn Analyzer>) -> Self {
        MemoryIndex {
            analyzer,
            parser: QueryParser::new(),
            docs: Vec::new(),
            ordinals: AHashMap::new(),
            postings: AHashMap::new(),
        }
    }

    /// Get a stored document by id.
    pub fn get_document(&self, id: &str) -> Option<&Document> {
        self.ordinals.get(id).map(|&ord| &self.docs[ord].document)
    }

    /// Ids of all documents in insertion order.
    pub fn ids(&self) -> Vec<&str> {
        self.docs.iter().map(|d| d.id.as_str()).collect()
    }

    fn analyze_document(&self, document: &Document) -> AHashMap<String, Vec<String>> {
        let mut tokens: AHashMap<String, Vec<String>> = AHashMap::new();

        // Sorted so that the composite field has a stable token order
        let mut names: Vec<&str> = document.field_names();
        names.sort_unstable();

        let mut all = Vec::new();
        for name in names {
            if let Some(FieldValue::Text(text)) = document.get_field(name) {
                let terms = self.analyzer.terms(text);
                all.extend(terms.iter().cloned());
                tokens.insert(name.to_string(), terms);
            }
        }
        tokens.insert(ALL_FIELD.to_string(), all);

        tokens
    }

    fn add_postings(&mut self, ord: usize) {
        for (field, terms) in &self.docs[ord].tokens {
            let field_postings = self.postings.entry(field.clone()).or_default();
            for term in terms {
                field_postings.entry(term.clone()).or_default().insert(ord);
            }
        }
    }

    fn remove_postings(&mut self, ord: usize) {
        for (field, terms) in &self.docs[ord].tokens {
            let Some(field_postings) = self.postings.get_mut(field) else {
                continue;
            };
            for term in terms {
                if let Some(docs) = field_postings.get_mut(term) {
                    docs.remove(&ord);
                    if docs.is_empty() {
                        field_postings.remove(term);
                    }
                }
            }
        }
    }

    fn store(&mut self, id: String, document: Document) {
        let tokens = self.analyze_document(&document);

        match self.ordinals.get(&id).copied() {
            Some(ord) => {
                log::debug!("Replacing document '{id}'");
                self.remove_postings(ord);
                self.docs[ord] = StoredDocument {
                    id,
                    document,
                    tokens,
                };
                self.add_postings(ord);
            }
            None => {
                let ord = self.docs.len();
                self.ordinals.insert(id.clone(), ord);
                self.docs.push(StoredDocument {
                    id,
                    document,
                    tokens,
                });
                self.add_postings(ord);
            }
        }
    }

    /// Inverse document frequency of a term in a field.
    fn idf(&self, field: &str, term: &str) -> f32 {
        let df = self
            .postings
            .get(field)
            .and_then(|terms| terms.get(term))
            .map_or(0, |docs| docs.len());
        if df == 0 {
            return 0.0;
        }
        (1.0 + self.docs.len() as f32 / df as f32).ln()
    }

    /// Score a document against a query; `None` means no match.
    fn score(&self, query: &Query, doc: &StoredDocument) -> Option<f32> {
        match query {
            Query::MatchNone => None,
            Query::Match { field, text } => {
                let field = field.as_deref().unwrap_or(ALL_FIELD);
                let tokens = doc.tokens.get(field)?;
                let matched: Vec<String> = self
                    .analyzer
                    .terms(text)
                    .into_iter()
                    .filter(|term| tokens.contains(term))
                    .collect();
                if matched.is_empty() {
                    return None;
                }
                Some(matched.iter().map(|term| self.idf(field, term)).sum())
            }
            Query::Phrase { field, text } => {
                let terms = self.analyzer.terms(text);
                if terms.is_empty() {
                    return None;
                }
                let matched = match field {
                    Some(field) => doc
                        .tokens
                        .get(field.as_str())
                        .is_some_and(|tokens| contains_phrase(tokens, &terms)),
                    None => doc
                        .tokens
                        .iter()
                        .filter(|(name, _)| name.as_str() != ALL_FIELD)
                        .any(|(_, tokens)| contains_phrase(tokens, &terms)),
                };
                let idf_field = field.as_deref().unwrap_or(ALL_FIELD);
                matched.then(|| terms.iter().map(|t| self.idf(idf_field, t)).sum())
            }
            Query::NumericRange(range) => doc
                .document
                .get_field(range.field())
                .and_then(|v| v.as_f64())
                .filter(|v| range.contains(v))
                .map(|_| CONSTANT_SCORE),
            Query::DateRange(range) => doc
                .document
                .get_field(range.field())
                .and_then(|v| v.as_datetime())
                .filter(|v| range.contains(v))
                .map(|_| CONSTANT_SCORE),
            Query::Boolean(boolean) => self.score_boolean(boolean, doc),
        }
    }

    fn score_boolean(&self, query: &BooleanQuery, doc: &StoredDocument) -> Option<f32> {
        if query
            .clauses_with(Occur::MustNot)
            .any(|q| self.score(q, doc).is_some())
        {
            return None;
        }

        let mut has_must = false;
        let mut must_score = 0.0;
        for q in query.clauses_with(Occur::Must) {
            has_must = true;
            must_score += self.score(q, doc)?;
        }

        let mut has_should = false;
        let mut should_matched = false;
        let mut should_score = 0.0;
        for q in query.clauses_with(Occur::Should) {
            has_should = true;
            if let Some(score) = self.score(q, doc) {
                should_matched = true;
                should_score += score;
            }
        }

        if has_must {
            Some(must_score + should_score)
        } else if has_should {
            should_matched.then_some(should_score)
        } else if query.clauses_with(Occur::MustNot).next().is_some() {
            // Only exclusions: everything not excluded matches
            Some(CONSTANT_SCORE)
        } else {
            None
        }
    }

    fn project(&self, doc: &StoredDocument, score: f32, request: &SearchRequest) -> Hit {
        let fields = request
            .projection()
            .field_names()
            .into_iter()
            .filter_map(|name| {
                doc.document
                    .get_field(name)
                    .map(|value| (name.to_string(), value.clone()))
            })
            .collect();

        Hit {
            id: doc.id.clone(),
            score,
            fields,
        }
    }
}

fn contains_phrase(tokens: &[String], terms: &[String]) -> bool {
    tokens.windows(terms.len()).any(|window| window == terms)
}

impl SearchIndex for MemoryIndex {
    fn submit(&mut self, batch: Batch) -> Result<()> {
        if let Some(op) = batch.iter().find(|op| op.id.trim().is_empty()) {
            return Err(UserSearchError::index(format!(
                "Batch contains a document without id ({} fields)",
                op.document.len()
            )));
        }

        let size = batch.len();
        for op in batch {
            self.store(op.id, op.document);
        }
        log::debug!(
            "Applied batch of {size} documents ({} in index)",
            self.docs.len()
        );

        Ok(())
    }

    fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let start = Instant::now();
        let query = self.parser.parse(request.query())?;
        log::debug!("Executing query {}", query.description());

        let mut matches: Vec<(usize, f32)> = self
            .docs
            .iter()
            .enumerate()
            .filter_map(|(ord, doc)| self.score(&query, doc).map(|score| (ord, score)))
            .collect();

        matches.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let facets = request
            .facets()
            .iter()
            .map(|(name, facet)| {
                let mut collector = FacetCollector::new(facet);
                for &(ord, _) in &matches {
                    collector.collect_doc(&self.docs[ord].document, self.analyzer.as_ref());
                }
                (name.clone(), collector.finalize())
            })
            .collect();

        let hits = matches
            .iter()
            .skip(request.offset())
            .take(request.size())
            .map(|&(ord, score)| self.project(&self.docs[ord], score, request))
            .collect();

        Ok(SearchResult {
            hits,
            total_hits: matches.len() as u64,
            max_score: matches.first().map_or(0.0, |m| m.1),
            took: start.elapsed(),
            facets,
        })
    }

    fn doc_count(&self) -> u64 {
        self.docs.len() as u64
    }
}
