//! Test utilities and module declarations for storage tests.

use crate::Storage;
use oews_atlas_core::{LocationKey, NewLocation, SalaryData, WageFigures, state_display_name};
use tempfile::TempDir;

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_storage() -> (Storage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let storage = Storage::new(&db_path).unwrap();
    (storage, temp_dir)
}

pub fn create_test_location(city: &str, state: &str) -> NewLocation {
    let key = LocationKey::new(city, state);
    NewLocation::for_key(&key, &state_display_name(&key.state))
}

pub fn create_test_salary(career: &str, location_id: Option<&str>, year: i32) -> SalaryData {
    SalaryData {
        career_keyword: career.to_owned(),
        location_id: location_id.map(ToOwned::to_owned),
        year,
        wages: WageFigures {
            hourly_median: Some(45.0),
            hourly_mean: Some(46.5),
            annual_median: Some(93_600.0),
            annual_mean: Some(96_720.0),
            ..WageFigures::default()
        },
        employment_count: Some(1_250),
        jobs_per_1000: Some(4.2),
        location_quotient: Some(1.05),
        mean_error_margin: Some(0.8),
        emp_error_margin: None,
        source: "BLS".to_owned(),
    }
}
