use std::collections::HashSet;

use async_trait::async_trait;
use oews_atlas_core::{NaturalKey, SalaryData};

use crate::error::StorageError;
use crate::storage::AtlasStats;

/// SalaryData persistence and lookups.
#[async_trait]
pub trait SalaryStore: Send + Sync {
    /// Bulk insert, skipping existing natural keys. Returns rows inserted.
    async fn insert_salaries(&self, records: &[SalaryData]) -> Result<usize, StorageError>;

    /// Natural keys already stored, used to seed the importer's dedup set.
    async fn load_natural_keys(&self) -> Result<HashSet<NaturalKey>, StorageError>;

    /// Lookup by natural key; `location_id = None` selects the national row.
    async fn get_salary(
        &self,
        career_keyword: &str,
        location_id: Option<&str>,
        year: i32,
    ) -> Result<Option<SalaryData>, StorageError>;
}

/// Aggregate statistics.
#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn get_stats(&self) -> Result<AtlasStats, StorageError>;
}
