//! Excel workbook sources.
//!
//! Only the first worksheet is read; its first row holds the column names.
//! Typed cells go straight into [`CellValue`](oews_atlas_core::CellValue):
//! numbers stay numbers, error cells such as `#N/A` become text.
//! Text columns (`AREA_TYPE`, `NAICS`, ...) accept numeric cells and render
//! them the way the spreadsheet shows them.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use serde::Deserialize;
use serde::de::value::{Error as CellError, MapDeserializer};
use serde::de::{Deserializer, IntoDeserializer, Visitor};

use crate::error::IngestError;
use crate::source::SourceRow;

/// Extensions read as workbooks rather than delimited text.
pub(crate) const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

static EMPTY: Data = Data::Empty;

/// Rows of one worksheet, header row excluded.
///
/// The sheet is held in memory; workbooks cannot be streamed row by row.
pub(crate) struct SheetRows {
    range: Range<Data>,
    headers: Vec<String>,
    /// Index into `range` of the next row to read. Row 0 is the header.
    next: usize,
}

impl SheetRows {
    pub(crate) fn new(range: Range<Data>) -> Self {
        let headers = (0..range.width())
            .map(|col| cell_text(range.get((0, col)).unwrap_or(&EMPTY)).to_ascii_uppercase())
            .collect();
        Self { range, headers, next: 1 }
    }

    pub(crate) fn headers(&self) -> &[String] {
        &self.headers
    }

    /// 1-based sheet row of the row read last, counted from the first used row.
    pub(crate) fn line(&self) -> u64 {
        u64::try_from(self.next).unwrap_or(u64::MAX)
    }

    fn cell(&self, row: usize, col: usize) -> &Data {
        self.range.get((row, col)).unwrap_or(&EMPTY)
    }

    fn is_blank(&self, row: usize) -> bool {
        (0..self.headers.len()).all(|col| matches!(self.cell(row, col), Data::Empty))
    }

    fn row(&self, row: usize) -> Result<SourceRow, CellError> {
        let cells = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(col, name)| (name.as_str(), SheetCell(self.cell(row, col))));
        SourceRow::deserialize(MapDeserializer::new(cells))
    }
}

impl Iterator for SheetRows {
    type Item = Result<SourceRow, CellError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.range.height() {
            let row = self.next;
            self.next += 1;
            if !self.is_blank(row) {
                return Some(self.row(row));
            }
        }
        None
    }
}

/// Loads the first worksheet of the workbook at `path`.
pub(crate) fn open_first_sheet(path: &Path) -> Result<SheetRows, IngestError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        IngestError::InvalidInput(format!("cannot open {}: {e}", path.display()))
    })?;
    let sheet = workbook.sheet_names().first().cloned().unwrap_or_default();
    let range = workbook.worksheet_range_at(0).ok_or_else(|| {
        IngestError::InvalidInput(format!("{} has no worksheets", path.display()))
    })??;
    tracing::info!(sheet = %sheet, rows = range.height(), "Worksheet loaded");
    Ok(SheetRows::new(range))
}

/// Cell text as the spreadsheet displays it; whole floats print without `.0`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_owned(),
        other => other.to_string(),
    }
}

/// A worksheet cell seen through serde.
struct SheetCell<'a>(&'a Data);

impl<'de> IntoDeserializer<'de, CellError> for SheetCell<'_> {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}

impl<'de> Deserializer<'de> for SheetCell<'_> {
    type Error = CellError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.0 {
            Data::Empty => visitor.visit_none(),
            Data::Int(i) => visitor.visit_i64(*i),
            Data::Float(f) => visitor.visit_f64(*f),
            Data::Bool(b) => visitor.visit_bool(*b),
            Data::String(s) => visitor.visit_str(s),
            other => visitor.visit_str(&other.to_string()),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_string(cell_text(self.0))
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_string(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.0 {
            Data::Empty => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char bytes byte_buf
        unit unit_struct newtype_struct seq tuple tuple_struct map struct enum
        identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used, reason = "test code")]

    use calamine::CellErrorType;
    use oews_atlas_core::CellValue;

    use super::*;

    fn sheet(rows: &[&[Data]]) -> Range<Data> {
        let height = u32::try_from(rows.len()).unwrap();
        let width = u32::try_from(rows.iter().map(|r| r.len()).max().unwrap_or(1)).unwrap();
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in (0u32..).zip(rows) {
            for (c, cell) in (0u32..).zip(row.iter()) {
                range.set_value((r, c), cell.clone());
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_owned())
    }

    fn header() -> Vec<Data> {
        [
            "area_title",
            "AREA_TYPE",
            "prim_state",
            "NAICS",
            "O_GROUP",
            "OCC_TITLE",
            "TOT_EMP",
            "A_MEDIAN",
            "A_PCT90",
        ]
        .into_iter()
        .map(text)
        .collect()
    }

    #[test]
    fn typed_cells_reach_cell_values() {
        let header = header();
        let national = [
            text("U.S."),
            Data::Float(1.0),
            text("US"),
            text("000000"),
            text("detailed"),
            text("Registered Nurses"),
            Data::Float(3_282_010.0),
            Data::Int(93_600),
            Data::Error(CellErrorType::NA),
        ];
        let mut rows = SheetRows::new(sheet(&[header.as_slice(), &national[..]]));

        let row = rows.next().unwrap().unwrap();

        assert_eq!(row.area_title, "U.S.");
        assert_eq!(row.area_type, "1");
        assert_eq!(row.naics, "000000");
        assert_eq!(row.tot_emp, CellValue::Numeric(3_282_010.0));
        assert_eq!(row.a_median, CellValue::Numeric(93_600.0));
        assert_eq!(row.a_pct90.normalize(), None);
        assert_eq!(row.h_median, CellValue::Absent);
        assert_eq!(rows.line(), 2);
        assert!(rows.next().is_none());
    }

    #[test]
    fn headers_are_upper_cased() {
        let rows = SheetRows::new(sheet(&[header().as_slice()]));
        assert_eq!(rows.headers()[0], "AREA_TITLE");
        assert_eq!(rows.headers()[2], "PRIM_STATE");
    }

    #[test]
    fn sentinel_text_and_blank_rows() {
        let header = header();
        let texas = [
            text("Texas"),
            Data::Int(2),
            text("TX"),
            text("000000"),
            text("detailed"),
            text("Registered Nurses"),
            text("**"),
            text("#"),
            Data::Empty,
        ];
        let blank = [Data::Empty];
        let mut rows = SheetRows::new(sheet(&[header.as_slice(), &blank[..], &texas[..]]));

        let row = rows.next().unwrap().unwrap();

        assert_eq!(row.area_title, "Texas");
        assert_eq!(row.area_type, "2");
        assert!(row.tot_emp.is_suppressed());
        assert!(row.a_median.is_suppressed());
        assert_eq!(row.a_pct90, CellValue::Absent);
        assert_eq!(rows.line(), 3);
        assert!(rows.next().is_none());
    }
}
