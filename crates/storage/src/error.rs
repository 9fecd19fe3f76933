//! Typed error enum for the storage layer.
//!
//! Callers match on specific failure modes (not found, duplicate, transient
//! lock contention) instead of downcasting opaque boxes.

use rusqlite::{ErrorCode, ffi};
use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Row not found for expected-present entity.
    #[error("not found: {entity} with key {key}")]
    NotFound { entity: &'static str, key: String },

    /// Unique constraint violation.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// SQL or file failure.
    #[error("database error: {0}")]
    Database(#[source] rusqlite::Error),

    /// No pooled connection became available.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Row data could not be converted into a domain type.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Migration failure.
    #[error("migration error: {0}")]
    Migration(String),

    /// A blocking storage task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl StorageError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Pool(_) => true,
            Self::Database(rusqlite::Error::SqliteFailure(err, _)) => {
                matches!(err.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
            },
            _ => false,
        }
    }

    /// Whether this error is a constraint violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

/// Custom `From<rusqlite::Error>` instead of a blanket `#[from]`.
///
/// - `QueryReturnedNoRows` → `NotFound` (generic; callers remap with entity context)
/// - unique / primary-key violations → `Duplicate`
/// - column values that fail conversion → `DataCorruption`
/// - everything else → `Database`
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => {
                Self::NotFound { entity: "row", key: "unknown".into() }
            },
            rusqlite::Error::SqliteFailure(code, message)
                if matches!(
                    code.extended_code,
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                ) =>
            {
                let message = message.unwrap_or_else(|| code.to_string());
                Self::Duplicate(message)
            },
            rusqlite::Error::FromSqlConversionFailure(idx, ty, source) => Self::DataCorruption {
                context: format!("column {idx} ({ty})"),
                source,
            },
            other => Self::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_database_is_transient() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert!(StorageError::from(busy).is_transient());
        assert!(!StorageError::Migration("v1".to_owned()).is_transient());
    }

    #[test]
    fn constraint_violation_maps_to_duplicate() {
        let violation = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE),
            Some("UNIQUE constraint failed: locations.city, locations.state".to_owned()),
        );
        let err = StorageError::from(violation);
        assert!(err.is_duplicate());
        assert!(err.to_string().contains("locations.city"));
    }

    #[test]
    fn foreign_key_violation_stays_database_error() {
        let violation = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY),
            None,
        );
        assert!(matches!(StorageError::from(violation), StorageError::Database(_)));
    }

    #[test]
    fn conversion_failure_maps_to_data_corruption() {
        let Err(bad) = chrono::DateTime::parse_from_rfc3339("yesterday") else {
            panic!("'yesterday' is not a timestamp");
        };
        let err = StorageError::from(rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            Box::new(bad),
        ));
        assert!(matches!(err, StorageError::DataCorruption { .. }));
        assert!(err.to_string().contains("column 5"));
        assert!(!err.is_transient());
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let err = StorageError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, StorageError::NotFound { .. }));
    }
}
