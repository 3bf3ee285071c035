use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by row ingestion.
///
/// The transformations themselves never fail; only loading rows from outside can.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input parsed but is not a collection of records.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// The format could not be inferred from the path and none was given.
    #[error("unsupported format for '{path}'")]
    UnsupportedFormat { path: String },
}

/// Error type returned when building an [`crate::execution::ExecutionEngine`].
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
