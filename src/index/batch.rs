//! Batches of pending index writes.

use crate::document::Document;

/// One staged write.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOperation {
    /// Unique document id.
    pub id: String,
    /// Document to store under `id`.
    pub document: Document,
}

/// An ordered group of pending writes applied to an index as one unit.
///
/// A batch is created empty, accumulates operations, is handed to
/// [`SearchIndex::submit`](crate::index::SearchIndex::submit) once and is
/// consumed by that call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    operations: Vec<BatchOperation>,
}

impl Batch {
    /// Create a new empty batch.
    pub fn new() -> Self {
        Batch {
            operations: Vec::new(),
        }
    }

    /// Stage a document under its id.
    pub fn add<S: Into<String>>(&mut self, id: S, document: Document) {
        self.operations.push(BatchOperation {
            id: id.into(),
            document,
        });
    }

    /// Get the number of staged operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Iterate staged operations in staging order.
    pub fn iter(&self) -> impl Iterator<Item = &BatchOperation> {
        self.operations.iter()
    }

    /// Ids of the staged operations in staging order.
    pub fn ids(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.id.as_str()).collect()
    }
}

impl IntoIterator for Batch {
    type Item = BatchOperation;
    type IntoIter = std::vec::IntoIter<BatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}
