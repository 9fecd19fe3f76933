//! Storage layer for oews-atlas
//!
//! SQLite-backed Location and SalaryData tables behind an r2d2 pool.
//! Bulk inserts skip rows that collide with a unique key, so overlapping
//! batches and repeated imports are no-ops for keys already stored.

mod error;
mod migrations;
mod sqlite_async;
mod storage;
#[cfg(test)]
mod tests;
pub mod traits;

pub use error::StorageError;
pub use migrations::SCHEMA_VERSION;
pub use storage::{AtlasStats, Storage};
pub use traits::{LocationStore, SalaryStore, StatsStore};
