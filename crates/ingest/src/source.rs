//! Source readers for OEWS tables: delimited text and Excel workbooks.
//!
//! Headers are matched case-insensitively (some vintages ship lower-case
//! names). Numeric cells arrive as [`CellValue`]s and are normalized once,
//! when a row becomes a [`SalaryData`] record.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use oews_atlas_core::{CellValue, SalaryData, WageFigures};
use serde::Deserialize;
use thiserror::Error;

use crate::error::IngestError;
use crate::sheet::{SheetRows, WORKBOOK_EXTENSIONS, open_first_sheet};

/// Columns without which no row can be classified.
const REQUIRED_COLUMNS: [&str; 3] = ["AREA_TITLE", "AREA_TYPE", "OCC_TITLE"];

/// Field delimiter of a delimited-text source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
}

impl Delimiter {
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Tab => b'\t',
        }
    }

    /// Tab for `.tsv` and `.txt` files, comma otherwise.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("tsv" | "txt") => Self::Tab,
            _ => Self::Comma,
        }
    }
}

impl FromStr for Delimiter {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comma" | "," | "csv" => Ok(Self::Comma),
            "tab" | "\\t" | "\t" | "tsv" => Ok(Self::Tab),
            other => Err(IngestError::InvalidInput(format!(
                "unknown delimiter '{other}', expected 'comma' or 'tab'"
            ))),
        }
    }
}

/// How a source file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited(Delimiter),
    /// First worksheet of an Excel or OpenDocument workbook.
    Workbook,
}

impl SourceFormat {
    /// Workbook for `.xlsx`, `.xlsm`, `.xlsb`, `.xls` and `.ods`; otherwise
    /// delimited text per [`Delimiter::for_path`].
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        match extension(path) {
            Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) => Self::Workbook,
            _ => Self::Delimited(Delimiter::for_path(path)),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase)
}

/// A single row that could not be read. Iteration continues past it unless
/// [`RowError::is_io_error`] holds.
#[derive(Debug, Error)]
pub enum RowError {
    #[error(transparent)]
    Delimited(#[from] csv::Error),

    #[error("{0}")]
    Sheet(#[from] serde::de::value::Error),
}

impl RowError {
    /// Whether the source itself became unreadable, as opposed to one bad row.
    #[must_use]
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Delimited(e) if e.is_io_error())
    }
}

/// One row of an OEWS table. Columns this pipeline does not use are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SourceRow {
    #[serde(default)]
    pub area: String,
    pub area_title: String,
    pub area_type: String,
    #[serde(default)]
    pub prim_state: String,
    #[serde(default)]
    pub naics: String,
    #[serde(default)]
    pub naics_title: String,
    #[serde(default)]
    pub occ_code: String,
    pub occ_title: String,
    #[serde(default, alias = "OCC_GROUP")]
    pub o_group: String,
    #[serde(default)]
    pub tot_emp: CellValue,
    #[serde(default)]
    pub emp_prse: CellValue,
    #[serde(default)]
    pub jobs_1000: CellValue,
    #[serde(default, alias = "LOC_Q")]
    pub loc_quotient: CellValue,
    #[serde(default)]
    pub h_mean: CellValue,
    #[serde(default)]
    pub a_mean: CellValue,
    #[serde(default)]
    pub mean_prse: CellValue,
    #[serde(default)]
    pub h_pct10: CellValue,
    #[serde(default)]
    pub h_pct25: CellValue,
    #[serde(default)]
    pub h_median: CellValue,
    #[serde(default)]
    pub h_pct75: CellValue,
    #[serde(default)]
    pub h_pct90: CellValue,
    #[serde(default)]
    pub a_pct10: CellValue,
    #[serde(default)]
    pub a_pct25: CellValue,
    #[serde(default)]
    pub a_median: CellValue,
    #[serde(default)]
    pub a_pct75: CellValue,
    #[serde(default)]
    pub a_pct90: CellValue,
}

impl SourceRow {
    #[must_use]
    pub fn wages(&self) -> WageFigures {
        WageFigures {
            hourly_10th: self.h_pct10.normalize(),
            hourly_25th: self.h_pct25.normalize(),
            hourly_median: self.h_median.normalize(),
            hourly_75th: self.h_pct75.normalize(),
            hourly_90th: self.h_pct90.normalize(),
            hourly_mean: self.h_mean.normalize(),
            annual_10th: self.a_pct10.normalize(),
            annual_25th: self.a_pct25.normalize(),
            annual_median: self.a_median.normalize(),
            annual_75th: self.a_pct75.normalize(),
            annual_90th: self.a_pct90.normalize(),
            annual_mean: self.a_mean.normalize(),
        }
    }

    /// The insert-ready record for this row at one location.
    #[must_use]
    pub fn to_salary(
        &self,
        career_keyword: &str,
        location_id: Option<String>,
        year: i32,
        source: &str,
    ) -> SalaryData {
        SalaryData {
            career_keyword: career_keyword.to_owned(),
            location_id,
            year,
            wages: self.wages(),
            employment_count: self.tot_emp.normalize_rounded(),
            jobs_per_1000: self.jobs_1000.normalize(),
            location_quotient: self.loc_quotient.normalize(),
            mean_error_margin: self.mean_prse.normalize(),
            emp_error_margin: self.emp_prse.normalize(),
            source: source.to_owned(),
        }
    }

    /// `"<area title> / <occupation title>"`, for logs and batch errors.
    #[must_use]
    pub fn context(&self) -> String {
        format!("{} / {}", self.area_title.trim(), self.occ_title.trim())
    }
}

/// Iterator over the rows of a source.
///
/// Items are per-row results: a row that fails to deserialize yields an
/// error and iteration continues. Delimited text is streamed one record at
/// a time; a workbook sheet is loaded whole.
pub struct SourceRows<R> {
    inner: Rows<R>,
}

enum Rows<R> {
    Delimited { reader: csv::Reader<R>, headers: StringRecord, record: StringRecord },
    Sheet(SheetRows),
}

impl<R: Read> SourceRows<R> {
    /// 1-based line (or sheet row) of the record read last.
    #[must_use]
    pub fn line(&self) -> u64 {
        match &self.inner {
            Rows::Delimited { record, .. } => record.position().map_or(0, csv::Position::line),
            Rows::Sheet(rows) => rows.line(),
        }
    }
}

impl<R: Read> Iterator for SourceRows<R> {
    type Item = Result<SourceRow, RowError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Rows::Delimited { reader, headers, record } => match reader.read_record(record) {
                Ok(false) => None,
                Ok(true) => {
                    Some(record.deserialize::<SourceRow>(Some(&*headers)).map_err(RowError::from))
                },
                Err(e) => Some(Err(e.into())),
            },
            Rows::Sheet(rows) => rows.next().map(|row| row.map_err(RowError::from)),
        }
    }
}

fn check_required_columns<'a>(
    headers: impl Iterator<Item = &'a str> + Clone,
) -> Result<(), IngestError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !headers.clone().any(|h| h == *c))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(IngestError::InvalidInput(format!(
        "source is missing required column(s): {}",
        missing.join(", ")
    )))
}

/// Wraps delimited text in a row iterator, upper-casing headers and
/// checking that the required columns are present.
pub fn source_rows<R: Read>(read: R, delimiter: Delimiter) -> Result<SourceRows<R>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .flexible(true)
        .trim(Trim::All)
        .from_reader(read);

    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_ascii_uppercase())
        .collect();
    check_required_columns(headers.iter())?;

    tracing::debug!(columns = headers.len(), "Source headers read");
    Ok(SourceRows { inner: Rows::Delimited { reader, headers, record: StringRecord::new() } })
}

fn sheet_source<R>(rows: SheetRows) -> Result<SourceRows<R>, IngestError> {
    check_required_columns(rows.headers().iter().map(String::as_str))?;
    tracing::debug!(columns = rows.headers().len(), "Worksheet headers read");
    Ok(SourceRows { inner: Rows::Sheet(rows) })
}

/// Opens `path`. An explicit `delimiter` forces delimited text; otherwise
/// the format follows [`SourceFormat::for_path`].
pub fn open_source(
    path: &Path,
    delimiter: Option<Delimiter>,
) -> Result<SourceRows<File>, IngestError> {
    match delimiter.map_or_else(|| SourceFormat::for_path(path), SourceFormat::Delimited) {
        SourceFormat::Workbook => sheet_source(open_first_sheet(path)?),
        SourceFormat::Delimited(delimiter) => {
            let file = File::open(path).map_err(|e| {
                IngestError::InvalidInput(format!("cannot open {}: {e}", path.display()))
            })?;
            source_rows(file, delimiter)
        },
    }
}
