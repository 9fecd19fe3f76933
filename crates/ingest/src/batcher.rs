//! Ingestion Batcher: the orchestration core of an import run.
//!
//! Each eligible row is classified, expanded into one record per
//! Location, checked against the set of natural keys already imported and
//! buffered. A full buffer is flushed: pending Locations first, then
//! SalaryData, both with skip-duplicates. The in-memory key set is the
//! primary dedup mechanism; the store's unique keys are the backstop.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use oews_atlas_core::{
    Granularity, LocationKey, MsaParser, NaturalKey, NewLocation, SalaryData, is_state_code,
    slugify,
};
use oews_atlas_storage::{LocationStore, SalaryStore, StorageError};

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::filter::{Eligibility, classify};
use crate::resolver::LocationResolver;
use crate::source::{Delimiter, SourceRow, SourceRows, open_source, source_rows};
use crate::summary::ImportSummary;

pub struct IngestionBatcher<S: ?Sized> {
    store: Arc<S>,
    config: IngestConfig,
    parser: MsaParser,
    resolver: LocationResolver<S>,
    /// Natural keys stored before this run plus everything queued since.
    imported: HashSet<NaturalKey>,
    buffer: Vec<SalaryData>,
    /// `"<area title> / <occupation>"` of each buffered record.
    contexts: Vec<String>,
    summary: ImportSummary,
    preloaded: bool,
    eligible_seen: u64,
}

impl<S> IngestionBatcher<S>
where
    S: LocationStore + SalaryStore + ?Sized,
{
    pub fn new(store: Arc<S>, config: IngestConfig) -> Self {
        let parser = MsaParser::new().with_short_names(&config.short_city_names);
        let buffer = Vec::with_capacity(config.batch_size);
        Self {
            resolver: LocationResolver::new(Arc::clone(&store)),
            store,
            config,
            parser,
            imported: HashSet::new(),
            buffer,
            contexts: Vec::new(),
            summary: ImportSummary::default(),
            preloaded: false,
            eligible_seen: 0,
        }
    }

    /// Loads stored Locations and natural keys. Call before the first row.
    pub async fn preload(&mut self) -> Result<(), IngestError> {
        self.resolver = LocationResolver::preload(Arc::clone(&self.store)).await?;
        let existing = self.store.load_natural_keys().await?;
        tracing::info!(existing = existing.len(), "Loaded existing salary keys");
        self.imported.extend(existing);
        self.preloaded = true;
        Ok(())
    }

    #[must_use]
    pub fn summary(&self) -> &ImportSummary {
        &self.summary
    }

    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Processes one source row.
    ///
    /// Ineligible and malformed rows are counted, never returned as errors.
    /// An error means the store failed and the run must stop.
    pub async fn process_row(&mut self, row: &SourceRow) -> Result<(), IngestError> {
        self.summary.rows_read += 1;

        let granularity = match classify(row, &self.config.occupation_prefixes) {
            Eligibility::Eligible(granularity) => granularity,
            Eligibility::Skipped(reason) => {
                self.summary.rows_filtered += 1;
                tracing::trace!(row = %row.context(), reason = reason.as_str(), "Row filtered");
                return Ok(());
            },
        };

        match self.stage_row(row, granularity).await {
            Ok(()) => {},
            Err(IngestError::InvalidInput(reason)) => {
                self.summary.rows_errored += 1;
                tracing::warn!(row = %row.context(), "Skipping malformed row: {}", reason);
                return Ok(());
            },
            Err(e) => return Err(e),
        }

        self.eligible_seen += 1;
        if self.config.progress_every > 0 && self.eligible_seen % self.config.progress_every == 0 {
            self.log_progress();
        }

        if self.buffer.len() >= self.config.batch_size
            || self.resolver.pending_len() >= self.config.batch_size
        {
            self.flush().await?;
        }
        Ok(())
    }

    async fn stage_row(
        &mut self,
        row: &SourceRow,
        granularity: Granularity,
    ) -> Result<(), IngestError> {
        let career = slugify(&row.occ_title);
        if career.is_empty() {
            return Err(IngestError::InvalidInput(format!(
                "occupation title '{}' has no usable characters",
                row.occ_title
            )));
        }

        match granularity {
            Granularity::National => self.enqueue(row, &career, None, granularity),
            Granularity::State => {
                let code = row.prim_state.trim().to_ascii_uppercase();
                if !is_state_code(&code) {
                    return Err(IngestError::InvalidInput(format!(
                        "invalid PRIM_STATE '{}' on a state row",
                        row.prim_state
                    )));
                }
                let id = self.resolver.resolve_state(&code, row.area_title.trim()).await?;
                self.enqueue(row, &career, Some(id), granularity);
            },
            Granularity::City => {
                let expansion = self.parser.expand(&row.area_title, Some(&row.prim_state));
                if expansion.combinations.is_empty() {
                    return Err(IngestError::InvalidInput(
                        "no resolvable cities in area title".to_owned(),
                    ));
                }
                if expansion.is_msa {
                    self.summary.msas_split += 1;
                }
                for key in &expansion.combinations {
                    let id = self.resolver.resolve(&key.city, &key.state, None).await?;
                    self.enqueue(row, &career, Some(id), granularity);
                }
            },
        }
        Ok(())
    }

    fn enqueue(
        &mut self,
        row: &SourceRow,
        career: &str,
        location_id: Option<String>,
        granularity: Granularity,
    ) {
        let key = NaturalKey::new(career, location_id.as_deref(), self.config.year);
        if !self.imported.insert(key) {
            self.summary.duplicates_skipped += 1;
            return;
        }

        self.buffer.push(row.to_salary(career, location_id, self.config.year, &self.config.source_tag));
        self.contexts.push(row.context());
        match granularity {
            Granularity::National => self.summary.national_created += 1,
            Granularity::State => self.summary.state_created += 1,
            Granularity::City => self.summary.city_created += 1,
        }
    }

    /// Writes pending Locations, then buffered SalaryData.
    ///
    /// A failure here is fatal: it is logged with the batch context and
    /// returned as [`IngestError::BatchWrite`].
    pub async fn flush(&mut self) -> Result<(), IngestError> {
        let locations = self.resolver.take_pending();
        if locations.is_empty() && self.buffer.is_empty() {
            return Ok(());
        }

        if !locations.is_empty() {
            let inserted = self
                .store
                .insert_locations(&locations)
                .await
                .map_err(|e| self.batch_error(e, locations.len()))?;
            self.summary.locations_created += inserted as u64;

            if inserted < locations.len() {
                let keys: Vec<LocationKey> = locations.iter().map(NewLocation::key).collect();
                let stored = self
                    .store
                    .location_ids_for(&keys)
                    .await
                    .map_err(|e| self.batch_error(e, locations.len()))?;
                let remapped = self.resolver.reconcile(&stored);
                if !remapped.is_empty() {
                    self.remap_buffer(&remapped);
                }
            }
        }

        if !self.buffer.is_empty() {
            let inserted = self
                .store
                .insert_salaries(&self.buffer)
                .await
                .map_err(|e| self.batch_error(e, locations.len()))?;
            self.summary.salaries_inserted += inserted as u64;
            self.summary.store_skipped += self.buffer.len().saturating_sub(inserted) as u64;
        }

        self.summary.batches_flushed += 1;
        tracing::debug!(
            batch = self.summary.batches_flushed,
            locations = locations.len(),
            records = self.buffer.len(),
            inserted_total = self.summary.salaries_inserted,
            "Batch flushed"
        );
        self.buffer.clear();
        self.contexts.clear();
        Ok(())
    }

    /// Points buffered records at the ids the store kept.
    fn remap_buffer(&mut self, remapped: &HashMap<String, String>) {
        for record in &mut self.buffer {
            let Some(new_id) = record.location_id.as_ref().and_then(|id| remapped.get(id)) else {
                continue;
            };
            self.imported.remove(&record.natural_key());
            record.location_id = Some(new_id.clone());
            self.imported.insert(record.natural_key());
        }
    }

    fn batch_error(&self, source: StorageError, locations: usize) -> IngestError {
        let context = match (self.contexts.first(), self.contexts.last()) {
            (Some(first), Some(last)) if self.contexts.len() > 1 => format!(
                "{} records, {locations} locations, first: {first}, last: {last}",
                self.contexts.len()
            ),
            (Some(only), _) => format!("1 record, {locations} locations: {only}"),
            _ => format!("{locations} locations, no records"),
        };
        tracing::error!(context = %context, error = %source, "Batch write failed; stopping import");
        IngestError::BatchWrite { context, source }
    }

    fn log_progress(&self) {
        let s = &self.summary;
        tracing::info!(
            processed = s.rows_read,
            created = s.created_total(),
            duplicates = s.duplicates_skipped,
            errored = s.rows_errored,
            filtered = s.rows_filtered,
            "Import progress"
        );
    }

    /// Flushes what is left and returns the final counts.
    pub async fn finish(mut self) -> Result<ImportSummary, IngestError> {
        self.flush().await?;
        let s = &self.summary;
        tracing::info!(
            rows = s.rows_read,
            eligible = s.rows_eligible(),
            national = s.national_created,
            state = s.state_created,
            city = s.city_created,
            msas_split = s.msas_split,
            duplicates = s.duplicates_skipped,
            store_skipped = s.store_skipped,
            errored = s.rows_errored,
            locations = s.locations_created,
            "Import complete"
        );
        Ok(self.summary)
    }

    /// Imports every row of `read`, then finishes the run.
    pub async fn import_reader<R: Read>(
        self,
        read: R,
        delimiter: Delimiter,
    ) -> Result<ImportSummary, IngestError> {
        let rows = source_rows(read, delimiter)?;
        self.import_rows(rows).await
    }

    /// Imports the file at `path`. See [`open_source`] for the delimiter.
    pub async fn import_path(
        self,
        path: &Path,
        delimiter: Option<Delimiter>,
    ) -> Result<ImportSummary, IngestError> {
        tracing::info!(path = %path.display(), "Importing source");
        let rows = open_source(path, delimiter)?;
        self.import_rows(rows).await
    }

    async fn import_rows<R: Read>(
        mut self,
        mut rows: SourceRows<R>,
    ) -> Result<ImportSummary, IngestError> {
        if !self.preloaded {
            self.preload().await?;
        }
        while let Some(result) = rows.next() {
            match result {
                Ok(row) => self.process_row(&row).await?,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    self.summary.rows_read += 1;
                    self.summary.rows_errored += 1;
                    tracing::warn!(line = rows.line(), error = %e, "Skipping unreadable row");
                },
            }
        }
        self.finish().await
    }
}
