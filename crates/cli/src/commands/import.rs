//! `import` and `analyze`: the write path and its dry run.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use oews_atlas_ingest::{Delimiter, IngestConfig, IngestionBatcher, analyze_path};
use oews_atlas_storage::Storage;

use crate::ensure_db_dir;

/// Flag overrides on top of [`IngestConfig::from_env`].
pub(crate) struct ImportOptions {
    pub year: Option<i32>,
    pub source_tag: Option<String>,
    pub batch_size: Option<usize>,
    pub occ_prefix: Vec<String>,
    pub delimiter: Option<String>,
}

impl ImportOptions {
    fn config(&self) -> IngestConfig {
        let mut config = IngestConfig::from_env();
        if let Some(year) = self.year {
            config = config.with_year(year);
        }
        if let Some(tag) = &self.source_tag {
            config = config.with_source_tag(tag.as_str());
        }
        if let Some(size) = self.batch_size {
            config = config.with_batch_size(size);
        }
        if !self.occ_prefix.is_empty() {
            config = config.with_occupation_prefixes(&self.occ_prefix);
        }
        config
    }
}

fn parse_delimiter(raw: Option<&str>) -> Result<Option<Delimiter>> {
    raw.map(str::parse::<Delimiter>).transpose().context("invalid --delimiter")
}

pub(crate) async fn run(db_path: &Path, file: &Path, options: ImportOptions) -> Result<()> {
    let delimiter = parse_delimiter(options.delimiter.as_deref())?;
    let config = options.config();

    ensure_db_dir(db_path)?;
    let storage = Arc::new(
        Storage::new(db_path).with_context(|| format!("opening {}", db_path.display()))?,
    );
    tracing::info!(
        db = %db_path.display(),
        year = config.year,
        batch_size = config.batch_size,
        "Starting import"
    );

    let summary = IngestionBatcher::new(storage, config)
        .import_path(file, delimiter)
        .await
        .with_context(|| format!("import of {} failed", file.display()))?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub(crate) fn run_analyze(file: &Path, occ_prefix: &[String], delimiter: Option<&str>) -> Result<()> {
    let delimiter = parse_delimiter(delimiter)?;
    let prefixes: Vec<String> =
        occ_prefix.iter().map(|p| p.trim().to_owned()).filter(|p| !p.is_empty()).collect();
    let analysis = analyze_path(file, delimiter, &prefixes)
        .with_context(|| format!("analysis of {} failed", file.display()))?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
