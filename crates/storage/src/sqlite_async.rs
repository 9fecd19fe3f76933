//! Async trait implementations for SQLite `Storage` via `spawn_blocking`.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use oews_atlas_core::{Location, LocationKey, NaturalKey, NewLocation, SalaryData};

use crate::Storage;
use crate::error::StorageError;
use crate::storage::AtlasStats;
use crate::traits::{LocationStore, SalaryStore, StatsStore};

/// Helper: run a blocking closure on the tokio blocking pool.
async fn blocking<F, T>(f: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// Body-generating macro for async-to-blocking delegation.
///
/// Each argument is annotated with a capture kind:
/// - `@str arg`: `.to_owned()` a `&str`, pass as `&arg`
/// - `@opt_str arg`: `.map(ToOwned::to_owned)` an `Option<&str>`, pass as `arg.as_deref()`
/// - `@slice arg`: `.to_vec()` a `&[T]`, pass as `&arg`
/// - `@val arg`: move directly (Copy/owned types)
macro_rules! delegate {
    ($self:ident, $method:ident $(, @$kind:ident $arg:ident)*) => {{
        let s = $self.clone();
        $(delegate!(@capture $kind $arg);)*
        blocking(move || s.$method($(delegate!(@pass $kind $arg)),*)).await
    }};
    (@capture str $arg:ident) => { let $arg = $arg.to_owned(); };
    (@capture opt_str $arg:ident) => { let $arg = $arg.map(ToOwned::to_owned); };
    (@capture slice $arg:ident) => { let $arg = $arg.to_vec(); };
    (@capture val $arg:ident) => { };
    (@pass str $arg:ident) => { &$arg };
    (@pass opt_str $arg:ident) => { $arg.as_deref() };
    (@pass slice $arg:ident) => { &$arg };
    (@pass val $arg:ident) => { $arg };
}

// ── LocationStore ────────────────────────────────────────────────

#[async_trait]
impl LocationStore for Storage {
    async fn insert_locations(&self, locations: &[NewLocation]) -> Result<usize, StorageError> {
        delegate!(self, insert_locations, @slice locations)
    }
    async fn location_ids_for(
        &self,
        keys: &[LocationKey],
    ) -> Result<HashMap<LocationKey, String>, StorageError> {
        delegate!(self, location_ids_for, @slice keys)
    }
    async fn find_location_id(
        &self,
        city: &str,
        state: &str,
    ) -> Result<Option<String>, StorageError> {
        delegate!(self, find_location_id, @str city, @str state)
    }
    async fn load_location_index(&self) -> Result<HashMap<LocationKey, String>, StorageError> {
        delegate!(self, load_location_index)
    }
    async fn get_location_by_slug(&self, slug: &str) -> Result<Option<Location>, StorageError> {
        delegate!(self, get_location_by_slug, @str slug)
    }
    async fn list_locations(&self, state: Option<&str>) -> Result<Vec<Location>, StorageError> {
        delegate!(self, list_locations, @opt_str state)
    }
}

// ── SalaryStore ──────────────────────────────────────────────────

#[async_trait]
impl SalaryStore for Storage {
    async fn insert_salaries(&self, records: &[SalaryData]) -> Result<usize, StorageError> {
        delegate!(self, insert_salaries, @slice records)
    }
    async fn load_natural_keys(&self) -> Result<HashSet<NaturalKey>, StorageError> {
        delegate!(self, load_natural_keys)
    }
    async fn get_salary(
        &self,
        career_keyword: &str,
        location_id: Option<&str>,
        year: i32,
    ) -> Result<Option<SalaryData>, StorageError> {
        delegate!(self, get_salary, @str career_keyword, @opt_str location_id, @val year)
    }
}

// ── StatsStore ───────────────────────────────────────────────────

#[async_trait]
impl StatsStore for Storage {
    async fn get_stats(&self) -> Result<AtlasStats, StorageError> {
        delegate!(self, get_stats)
    }
}
