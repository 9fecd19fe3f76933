//! Typed error enum for the import pipeline.

use oews_atlas_storage::StorageError;
use thiserror::Error;

use crate::source::RowError;

/// Pipeline error unifying storage, source and batch-write failures.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Storage operation failed outside a batch flush (preload, lookups).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// The source file could not be opened or read.
    #[error("source: {0}")]
    Source(#[from] csv::Error),

    /// A workbook sheet could not be loaded.
    #[error("workbook: {0}")]
    Workbook(#[from] calamine::Error),

    /// Malformed input: a bad row, or an invalid option value.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A batch flush failed; the run stops here.
    #[error("batch write failed ({context}): {source}")]
    BatchWrite {
        context: String,
        #[source]
        source: StorageError,
    },
}

impl IngestError {
    /// Whether this error is likely transient (worth re-running the import).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) | Self::BatchWrite { source: e, .. } => e.is_transient(),
            Self::Source(_) | Self::Workbook(_) | Self::InvalidInput(_) => false,
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::Source(csv::Error::from(err))
    }
}

impl From<RowError> for IngestError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Delimited(e) => Self::Source(e),
            RowError::Sheet(e) => Self::InvalidInput(e.to_string()),
        }
    }
}
