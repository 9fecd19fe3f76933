//! Test utilities and module declarations for pipeline tests.

use std::sync::Arc;

use oews_atlas_core::CellValue;
use oews_atlas_storage::Storage;
use tempfile::TempDir;

use crate::SourceRow;

/// National, state and metro rows for one occupation, plus rows every
/// filter rejects.
pub const SAMPLE_CSV: &str = "\
AREA,AREA_TITLE,AREA_TYPE,PRIM_STATE,NAICS,NAICS_TITLE,OCC_CODE,OCC_TITLE,O_GROUP,TOT_EMP,H_MEDIAN,A_MEDIAN,A_PCT90
99,U.S.,1,US,000000,Cross-industry,29-1141,Registered Nurses,detailed,\"3,282,010\",45.00,93600,#
48,Texas,2,TX,000000,Cross-industry,29-1141,Registered Nurses,detailed,\"230,000\",41.00,85000,120000
19100,\"Dallas-Fort Worth-Arlington, TX\",4,TX,000000,Cross-industry,29-1141,Registered Nurses,detailed,\"70,000\",44.00,91000,125000
4800003,West Texas nonmetropolitan area,6,TX,000000,Cross-industry,29-1141,Registered Nurses,detailed,900,35.00,72000,90000
99,U.S.,1,US,000000,Cross-industry,29-0000,Healthcare Practitioners and Technical Occupations,major,\"9,000,000\",40.00,83000,*
99,U.S.,1,US,622000,Hospitals,29-1141,Registered Nurses,detailed,\"1,800,000\",44.00,92000,*
";

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_storage() -> (Arc<Storage>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = Storage::new(&temp_dir.path().join("test.db")).unwrap();
    (Arc::new(storage), temp_dir)
}

pub fn create_test_row(area_title: &str, area_type: &str, prim_state: &str) -> SourceRow {
    SourceRow {
        area_title: area_title.to_owned(),
        area_type: area_type.to_owned(),
        prim_state: prim_state.to_owned(),
        naics: "000000".to_owned(),
        occ_code: "29-1141".to_owned(),
        occ_title: "Registered Nurses".to_owned(),
        o_group: "detailed".to_owned(),
        tot_emp: CellValue::parse("1,250"),
        h_median: CellValue::Numeric(44.0),
        a_median: CellValue::Numeric(91_520.0),
        a_pct90: CellValue::parse("#"),
        ..SourceRow::default()
    }
}

mod analysis_tests;
mod resolver_tests;
