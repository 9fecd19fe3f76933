//! Shared constants for oews-atlas.
//!
//! Centralizes values used by the ingest pipeline, the storage layer and the CLI.

/// Buffered SalaryData records that trigger a flush.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Upper bound for a configured batch size (one SQLite transaction per flush).
pub const MAX_BATCH_SIZE: usize = 5000;

/// Eligible rows between two progress log lines.
pub const DEFAULT_PROGRESS_EVERY: u64 = 500;

/// Survey year stamped on imported rows when none is configured.
pub const DEFAULT_YEAR: i32 = 2024;

/// Provenance tag stored in `salary_data.source`.
pub const DEFAULT_SOURCE_TAG: &str = "BLS";

/// NAICS code of the cross-industry aggregate rows.
pub const CROSS_INDUSTRY_NAICS: &str = "000000";

/// `O_GROUP` value of single-occupation (non-rollup) rows.
pub const DETAILED_OCC_GROUP: &str = "detailed";

/// SQLite connection pool: maximum connections.
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;

/// Maximum number of rows returned by listing queries.
pub const MAX_QUERY_LIMIT: usize = 10_000;

/// Number of sample area titles kept per area type by source analysis.
pub const ANALYSIS_SAMPLES_PER_TYPE: usize = 5;
