//! Batched index population.

use crate::error::{Result, UserSearchError};
use crate::index::{Batch, SearchIndex};
use crate::user::Indexable;

/// Default number of documents per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Log target of the seeding progress records, emitted at info.
pub const PROGRESS_TARGET: &str = module_path!();

/// Outcome of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Number of batches submitted.
    pub batches: usize,
    /// Number of documents submitted.
    pub documents: usize,
}

/// Feeds records into an index in batches of at most `batch_size`.
#[derive(Debug, Clone)]
pub struct BatchLoader {
    batch_size: usize,
}

impl BatchLoader {
    pub fn new(batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(UserSearchError::invalid_argument(
                "batch size must be greater than zero",
            ));
        }
        Ok(BatchLoader { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Stage `records` in order and submit a batch each time it is full;
    /// a non-empty remainder is submitted last.
    pub fn load<I, R>(&self, index: &mut I, records: &[R]) -> Result<LoadReport>
    where
        I: SearchIndex,
        R: Indexable,
    {
        let mut report = LoadReport::default();
        log::info!("Seeding index with {} records", records.len());

        let mut batch = index.new_batch();
        for record in records {
            batch.add(record.doc_id(), record.to_document()?);

            if batch.len() == self.batch_size {
                let full = std::mem::replace(&mut batch, index.new_batch());
                self.submit(index, full, &mut report)?;
                log::info!("Seeded batch {}", report.batches);
            }
        }

        if !batch.is_empty() {
            self.submit(index, batch, &mut report)?;
            log::info!("Seeded last batch {}", report.batches);
        }

        Ok(report)
    }

    fn submit<I: SearchIndex>(
        &self,
        index: &mut I,
        batch: Batch,
        report: &mut LoadReport,
    ) -> Result<()> {
        let size = batch.len();
        let number = report.batches + 1;

        index.submit(batch).map_err(|e| {
            UserSearchError::index(format!("Failed to submit batch {number} ({size} documents): {e}"))
        })?;

        report.batches = number;
        report.documents += size;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::search::{SearchRequest, SearchResult};

    struct Numbered(u64);

    impl Indexable for Numbered {
        fn doc_id(&self) -> String {
            self.0.to_string()
        }

        fn to_document(&self) -> Result<Document> {
            Ok(Document::builder().add_integer("id", self.0 as i64).build())
        }
    }

    #[derive(Default)]
    struct RecordingIndex {
        batches: Vec<Vec<String>>,
        fail_on: Option<usize>,
    }

    impl SearchIndex for RecordingIndex {
        fn submit(&mut self, batch: Batch) -> Result<()> {
            if self.fail_on == Some(self.batches.len() + 1) {
                return Err(UserSearchError::index("disk full"));
            }
            self.batches
                .push(batch.ids().into_iter().map(String::from).collect());
            Ok(())
        }

        fn search(&self, _request: &SearchRequest) -> Result<SearchResult> {
            Ok(SearchResult::empty())
        }

        fn doc_count(&self) -> u64 {
            self.batches.iter().map(|b| b.len() as u64).sum()
        }
    }

    fn records(n: u64) -> Vec<Numbered> {
        (0..n).map(Numbered).collect()
    }

    #[test]
    fn test_progress_target() {
        assert_eq!(PROGRESS_TARGET, "usersearch::loader");
    }

    #[test]
    fn test_rejects_zero_batch_size() {
        assert!(BatchLoader::new(0).is_err());
        assert_eq!(BatchLoader::new(1).unwrap().batch_size(), 1);
    }

    #[test]
    fn test_exact_multiple_has_no_partial_batch() {
        let mut index = RecordingIndex::default();
        let report = BatchLoader::new(3).unwrap().load(&mut index, &records(6)).unwrap();

        assert_eq!(report, LoadReport { batches: 2, documents: 6 });
        assert_eq!(index.batches, vec![vec!["0", "1", "2"], vec!["3", "4", "5"]]);
    }

    #[test]
    fn test_remainder_is_flushed() {
        let mut index = RecordingIndex::default();
        let report = BatchLoader::new(3).unwrap().load(&mut index, &records(7)).unwrap();

        assert_eq!(report.batches, 3);
        assert_eq!(index.batches[2], vec!["6"]);
    }

    #[test]
    fn test_empty_input() {
        let mut index = RecordingIndex::default();
        let report = BatchLoader::new(3)
            .unwrap()
            .load::<_, Numbered>(&mut index, &[])
            .unwrap();

        assert_eq!(report, LoadReport::default());
        assert!(index.batches.is_empty());
    }

    #[test]
    fn test_submit_error_names_batch() {
        let mut index = RecordingIndex {
            fail_on: Some(2),
            ..RecordingIndex::default()
        };
        let err = BatchLoader::new(2)
            .unwrap()
            .load(&mut index, &records(5))
            .unwrap_err();

        assert!(err.to_string().contains("batch 2"));
        assert_eq!(index.batches.len(), 1);
    }
}
