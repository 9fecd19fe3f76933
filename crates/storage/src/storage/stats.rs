use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::{Storage, get_conn, log_row_error};
use crate::error::StorageError;

/// Row counts across both tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasStats {
    pub locations: u64,
    pub state_locations: u64,
    pub city_locations: u64,
    pub salary_rows: u64,
    pub national_rows: u64,
    pub state_rows: u64,
    pub city_rows: u64,
    pub careers: u64,
    pub years: Vec<i32>,
}

impl Storage {
    /// Get storage statistics.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn get_stats(&self) -> Result<AtlasStats, StorageError> {
        let conn = get_conn(&self.pool)?;
        let count = |sql: &str| -> Result<u64, StorageError> {
            let n: i64 = conn.query_row(sql, params![], |row| row.get(0))?;
            Ok(n as u64)
        };

        let locations = count("SELECT COUNT(*) FROM locations")?;
        let state_locations = count("SELECT COUNT(*) FROM locations WHERE city = ''")?;
        let salary_rows = count("SELECT COUNT(*) FROM salary_data")?;
        let national_rows = count("SELECT COUNT(*) FROM salary_data WHERE location_id IS NULL")?;
        let state_rows = count(
            "SELECT COUNT(*) FROM salary_data s JOIN locations l ON l.id = s.location_id
             WHERE l.city = ''",
        )?;
        let careers = count("SELECT COUNT(DISTINCT career_keyword) FROM salary_data")?;

        let mut stmt = conn.prepare("SELECT DISTINCT year FROM salary_data ORDER BY year")?;
        let years = stmt.query_map([], |row| row.get(0))?.filter_map(log_row_error).collect();

        Ok(AtlasStats {
            locations,
            state_locations,
            city_locations: locations.saturating_sub(state_locations),
            salary_rows,
            national_rows,
            state_rows,
            city_rows: salary_rows.saturating_sub(national_rows).saturating_sub(state_rows),
            careers,
            years,
        })
    }
}
