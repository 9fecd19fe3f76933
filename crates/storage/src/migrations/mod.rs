#![allow(
    clippy::redundant_pub_crate,
    reason = "migrations module is private, pub(crate) is intentional"
)]

mod v1;
mod v2;

use rusqlite::Connection;

use crate::error::StorageError;

pub const SCHEMA_VERSION: i32 = 2;

/// Brings the schema up to [`SCHEMA_VERSION`], tracked in `PRAGMA user_version`.
pub(crate) fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current_version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    tracing::info!("Database schema version: {} (target: {})", current_version, SCHEMA_VERSION);

    if current_version > SCHEMA_VERSION {
        return Err(StorageError::Migration(format!(
            "database schema v{current_version} is newer than supported v{SCHEMA_VERSION}"
        )));
    }

    if current_version < 1i32 {
        tracing::info!("Running migration v1: locations and salary_data");
        conn.execute_batch(v1::SQL)
            .map_err(|e| StorageError::Migration(format!("v1: {e}")))?;
    }

    if current_version < 2i32 {
        tracing::info!("Running migration v2: salary_data(location_id, year) index");
        conn.execute_batch(v2::SQL)
            .map_err(|e| StorageError::Migration(format!("v2: {e}")))?;
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tracing::info!("Database schema up to date (version {})", SCHEMA_VERSION);

    Ok(())
}
