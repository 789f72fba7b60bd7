pub mod use_cases;

pub use use_cases::ingestion::{CsvIngestUseCase, DEFAULT_BATCH_SIZE};
