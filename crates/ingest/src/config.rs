//! Import settings with environment-variable defaults.

use oews_atlas_core::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_PROGRESS_EVERY, DEFAULT_SOURCE_TAG, DEFAULT_YEAR, MAX_BATCH_SIZE,
};
use oews_atlas_core::{env_non_empty, env_parse_clamped, env_parse_with_default};

/// Settings for one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Survey year stamped on every SalaryData row.
    pub year: i32,
    /// Provenance tag stored in `salary_data.source`.
    pub source_tag: String,
    /// Buffered records that trigger a flush, `1..=MAX_BATCH_SIZE`.
    pub batch_size: usize,
    /// Eligible rows between progress log lines; 0 disables them.
    pub progress_every: u64,
    /// Keep only occupations whose `OCC_CODE` starts with one of these.
    /// Empty keeps every occupation.
    pub occupation_prefixes: Vec<String>,
    /// Short city names (two characters or fewer) kept by the MSA parser.
    pub short_city_names: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            source_tag: DEFAULT_SOURCE_TAG.to_owned(),
            batch_size: DEFAULT_BATCH_SIZE,
            progress_every: DEFAULT_PROGRESS_EVERY,
            occupation_prefixes: Vec::new(),
            short_city_names: Vec::new(),
        }
    }
}

impl IngestConfig {
    /// Defaults overridden by `OEWS_ATLAS_BATCH_SIZE`,
    /// `OEWS_ATLAS_PROGRESS_EVERY` and `OEWS_ATLAS_SHORT_CITY_NAMES`
    /// (comma-separated).
    #[must_use]
    pub fn from_env() -> Self {
        let short_city_names = env_non_empty("OEWS_ATLAS_SHORT_CITY_NAMES")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();
        Self {
            batch_size: env_parse_clamped(
                "OEWS_ATLAS_BATCH_SIZE",
                DEFAULT_BATCH_SIZE,
                1,
                MAX_BATCH_SIZE,
            ),
            progress_every: env_parse_with_default(
                "OEWS_ATLAS_PROGRESS_EVERY",
                DEFAULT_PROGRESS_EVERY,
            ),
            short_city_names,
            ..Self::default()
        }
    }

    /// Sets the batch size, clamped to `1..=MAX_BATCH_SIZE`.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    #[must_use]
    pub fn with_source_tag(mut self, source_tag: impl Into<String>) -> Self {
        self.source_tag = source_tag.into();
        self
    }

    #[must_use]
    pub fn with_occupation_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.occupation_prefixes = prefixes
            .into_iter()
            .map(|p| p.as_ref().trim().to_owned())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(ToOwned::to_owned).collect()
}
