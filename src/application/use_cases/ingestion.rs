// ============================================================
// CSV INGESTION USE CASE
// ============================================================
// Stream raw records, transform, persist in batches, report

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::distribution::AgeDistribution;
use crate::domain::error::Result;
use crate::domain::record::RawRecord;
use crate::domain::user::{transform, UserEntity};
use crate::infrastructure::csv::RecordReader;
use crate::infrastructure::db::UserStore;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Drive one CSV file through the ingestion pipeline.
///
/// Records are consumed one at a time in file order. A record failing
/// validation is logged and skipped; the run continues. Accepted entities
/// accumulate and are flushed as one bulk write whenever the buffer
/// reaches `batch_size`, plus once more for a trailing partial batch. A
/// storage failure aborts the run; batches flushed before it stay
/// persisted.
pub struct CsvIngestUseCase<S: UserStore> {
    store: Arc<S>,
    batch_size: usize,
}

impl<S: UserStore> CsvIngestUseCase<S> {
    pub fn new(store: Arc<S>, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    /// Load the CSV at `csv_path` and return the post-ingestion age
    /// distribution of the stored population.
    pub async fn execute(&self, csv_path: &Path) -> Result<AgeDistribution> {
        let reader = RecordReader::open(csv_path)?;
        self.ingest(reader).await?;

        let distribution = self.store.age_distribution().await?;
        info!(
            "Age distribution report: <20: {}%, 20-40: {}%, 40-60: {}%, >60: {}%",
            distribution.under_20,
            distribution.between_20_40,
            distribution.between_40_60,
            distribution.above_60
        );
        Ok(distribution)
    }

    /// Consume a record stream, buffering accepted entities and flushing
    /// full batches. An `Err` item from the stream is fatal.
    pub async fn ingest<I>(&self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<RawRecord>>,
    {
        let mut batch: Vec<UserEntity> = Vec::with_capacity(self.batch_size);

        for record in records {
            let record = record?;
            match transform(&record) {
                Ok(user) => {
                    batch.push(user);
                    if batch.len() >= self.batch_size {
                        self.store.insert_batch(&batch).await?;
                        batch.clear();
                    }
                }
                Err(err) => {
                    warn!("Skipping record due to error: {}", err);
                }
            }
        }

        if !batch.is_empty() {
            self.store.insert_batch(&batch).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::domain::record::set_nested;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    struct RecordingStore {
        flushes: Mutex<Vec<Vec<UserEntity>>>,
        fail_on_insert: bool,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                flushes: Mutex::new(Vec::new()),
                fail_on_insert: false,
            }
        }

        fn failing() -> Self {
            Self {
                flushes: Mutex::new(Vec::new()),
                fail_on_insert: true,
            }
        }

        fn flush_sizes(&self) -> Vec<usize> {
            self.flushes.lock().unwrap().iter().map(Vec::len).collect()
        }

        fn flushed_names(&self) -> Vec<String> {
            self.flushes
                .lock()
                .unwrap()
                .iter()
                .flatten()
                .map(|user| user.name.clone())
                .collect()
        }
    }

    #[async_trait]
    impl UserStore for RecordingStore {
        async fn insert_batch(&self, users: &[UserEntity]) -> Result<()> {
            if self.fail_on_insert {
                return Err(AppError::DatabaseError("insert refused".to_string()));
            }
            self.flushes.lock().unwrap().push(users.to_vec());
            Ok(())
        }

        async fn age_distribution(&self) -> Result<AgeDistribution> {
            Ok(AgeDistribution::empty())
        }
    }

    fn valid_record(first: &str, age: &str) -> Result<RawRecord> {
        let mut record = RawRecord::new();
        set_nested(&mut record, "name.firstName", Value::String(first.to_string()));
        set_nested(
            &mut record,
            "name.lastName",
            Value::String("Example".to_string()),
        );
        set_nested(&mut record, "age", Value::String(age.to_string()));
        Ok(record)
    }

    fn invalid_record() -> Result<RawRecord> {
        let mut record = RawRecord::new();
        set_nested(&mut record, "name.firstName", Value::String("No".to_string()));
        set_nested(&mut record, "name.lastName", Value::String("Age".to_string()));
        Ok(record)
    }

    #[tokio::test]
    async fn test_flushes_in_fixed_batches() {
        let store = Arc::new(RecordingStore::new());
        let use_case = CsvIngestUseCase::new(store.clone(), 2);

        let records = vec![
            valid_record("A", "10"),
            valid_record("B", "20"),
            valid_record("C", "30"),
            valid_record("D", "40"),
            valid_record("E", "50"),
        ];
        use_case.ingest(records).await.unwrap();

        assert_eq!(store.flush_sizes(), vec![2, 2, 1]);
        assert_eq!(
            store.flushed_names(),
            vec![
                "A Example",
                "B Example",
                "C Example",
                "D Example",
                "E Example"
            ]
        );
    }

    #[tokio::test]
    async fn test_exact_multiple_has_no_trailing_flush() {
        let store = Arc::new(RecordingStore::new());
        let use_case = CsvIngestUseCase::new(store.clone(), 2);

        let records = vec![valid_record("A", "10"), valid_record("B", "20")];
        use_case.ingest(records).await.unwrap();

        assert_eq!(store.flush_sizes(), vec![2]);
    }

    #[tokio::test]
    async fn test_invalid_records_are_skipped_not_fatal() {
        let store = Arc::new(RecordingStore::new());
        let use_case = CsvIngestUseCase::new(store.clone(), 10);

        let records = vec![
            valid_record("A", "10"),
            invalid_record(),
            valid_record("B", "not-a-number"),
            valid_record("C", "30"),
        ];
        use_case.ingest(records).await.unwrap();

        assert_eq!(store.flush_sizes(), vec![2]);
        assert_eq!(store.flushed_names(), vec!["A Example", "C Example"]);
    }

    #[tokio::test]
    async fn test_no_accepted_records_means_no_flush() {
        let store = Arc::new(RecordingStore::new());
        let use_case = CsvIngestUseCase::new(store.clone(), 10);

        use_case.ingest(vec![invalid_record()]).await.unwrap();

        assert!(store.flush_sizes().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_aborts_ingestion() {
        let store = Arc::new(RecordingStore::failing());
        let use_case = CsvIngestUseCase::new(store.clone(), 1);

        let err = use_case
            .ingest(vec![valid_record("A", "10"), valid_record("B", "20")])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_stream_error_is_fatal() {
        let store = Arc::new(RecordingStore::new());
        let use_case = CsvIngestUseCase::new(store.clone(), 10);

        let records = vec![
            valid_record("A", "10"),
            Err(AppError::IoError("stream closed".to_string())),
        ];
        let err = use_case.ingest(records).await.unwrap_err();

        assert!(matches!(err, AppError::IoError(_)));
    }

    #[tokio::test]
    async fn test_execute_streams_file_in_order() {
        let store = Arc::new(RecordingStore::new());
        let use_case = CsvIngestUseCase::new(store.clone(), 2);

        let path = std::env::temp_dir().join("demograph_ingest_test.csv");
        std::fs::write(
            &path,
            "name.firstName,name.lastName,age\n\
             Ada,Lovelace,36\n\
             \n\
             Broken,Row,\n\
             Grace,Hopper,45\n\
             Alan,Turing,41\n",
        )
        .unwrap();

        let distribution = use_case.execute(&path).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(distribution, AgeDistribution::empty());
        assert_eq!(store.flush_sizes(), vec![2, 1]);
        assert_eq!(
            store.flushed_names(),
            vec!["Ada Lovelace", "Grace Hopper", "Alan Turing"]
        );
    }

    #[tokio::test]
    async fn test_execute_missing_file_is_not_found() {
        let store = Arc::new(RecordingStore::new());
        let use_case = CsvIngestUseCase::new(store, DEFAULT_BATCH_SIZE);

        let err = use_case
            .execute(Path::new("/nonexistent/people.csv"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        // No partial processing was attempted
    }
}
