use serde::Serialize;

/// Counts reported at the end of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Data rows read from the source, including unreadable ones.
    pub rows_read: u64,
    /// Rows outside the eligibility filter.
    pub rows_filtered: u64,
    /// Malformed rows, logged and skipped.
    pub rows_errored: u64,
    pub national_created: u64,
    pub state_created: u64,
    pub city_created: u64,
    /// Metro rows whose title named several cities.
    pub msas_split: u64,
    /// Records whose natural key was already imported.
    pub duplicates_skipped: u64,
    pub locations_created: u64,
    pub salaries_inserted: u64,
    /// Records rejected by the store's own unique key.
    pub store_skipped: u64,
    pub batches_flushed: u64,
}

impl ImportSummary {
    /// SalaryData records queued this run, across all granularities.
    #[must_use]
    pub const fn created_total(&self) -> u64 {
        self.national_created + self.state_created + self.city_created
    }

    /// Rows that passed the filter and parsed cleanly.
    #[must_use]
    pub const fn rows_eligible(&self) -> u64 {
        self.rows_read.saturating_sub(self.rows_filtered).saturating_sub(self.rows_errored)
    }
}
