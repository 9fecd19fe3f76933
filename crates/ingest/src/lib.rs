//! Import pipeline for oews-atlas
//!
//! Reads OEWS source rows from CSV, TSV or Excel workbooks, keeps the
//! eligible ones, expands metro areas into (city, state) Locations and
//! writes deduplicated SalaryData in bounded batches.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]

mod analysis;
mod batcher;
mod config;
mod error;
mod filter;
mod resolver;
mod sheet;
mod source;
mod summary;
#[cfg(test)]
mod tests;

pub use analysis::{AreaTypeBreakdown, SourceAnalysis, analyze_path, analyze_reader};
pub use batcher::IngestionBatcher;
pub use config::IngestConfig;
pub use error::IngestError;
pub use filter::{Eligibility, SkipReason, classify};
pub use resolver::LocationResolver;
pub use source::{
    Delimiter, RowError, SourceFormat, SourceRow, SourceRows, open_source, source_rows,
};
pub use summary::ImportSummary;
