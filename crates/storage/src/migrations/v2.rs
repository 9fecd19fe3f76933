//! Migration v2: lookup index by location and year

pub(super) const SQL: &str = "
CREATE INDEX IF NOT EXISTS idx_salary_location_year ON salary_data(location_id, year);
";
