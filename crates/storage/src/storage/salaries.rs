use std::collections::HashSet;

use chrono::Utc;
use oews_atlas_core::{NaturalKey, SalaryData, WageFigures};
use rusqlite::{OptionalExtension as _, params};

use super::{Storage, get_conn, log_row_error};
use crate::error::StorageError;

const SALARY_COLUMNS: &str = "career_keyword, location_id, year,
    hourly_10th, hourly_25th, hourly_median, hourly_75th, hourly_90th, hourly_mean,
    annual_10th, annual_25th, annual_median, annual_75th, annual_90th, annual_mean,
    employment_count, jobs_per_1000, location_quotient, mean_error_margin, emp_error_margin,
    source";

impl Storage {
    /// Bulk-insert SalaryData in one transaction, skipping records whose
    /// natural key `(career_keyword, location_id, year)` already exists.
    ///
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    /// Returns error if the transaction fails (including a `location_id` with
    /// no Location row); no row of the batch is kept.
    pub fn insert_salaries(&self, records: &[SalaryData]) -> Result<usize, StorageError> {
        if records.is_empty() {
            return Ok(0);
        }
        let mut conn = get_conn(&self.pool)?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        let mut inserted = 0usize;
        {
            let sql = format!(
                "INSERT OR IGNORE INTO salary_data ({SALARY_COLUMNS}, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                         ?16, ?17, ?18, ?19, ?20, ?21, ?22)"
            );
            let mut stmt = tx.prepare_cached(&sql)?;
            for rec in records {
                let w = &rec.wages;
                inserted += stmt.execute(params![
                    rec.career_keyword,
                    rec.location_id,
                    rec.year,
                    w.hourly_10th,
                    w.hourly_25th,
                    w.hourly_median,
                    w.hourly_75th,
                    w.hourly_90th,
                    w.hourly_mean,
                    w.annual_10th,
                    w.annual_25th,
                    w.annual_median,
                    w.annual_75th,
                    w.annual_90th,
                    w.annual_mean,
                    rec.employment_count,
                    rec.jobs_per_1000,
                    rec.location_quotient,
                    rec.mean_error_margin,
                    rec.emp_error_margin,
                    rec.source,
                    now,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(batch = records.len(), inserted, "SalaryData batch written");
        Ok(inserted)
    }

    /// Natural keys of every stored SalaryData row.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn load_natural_keys(&self) -> Result<HashSet<NaturalKey>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare("SELECT career_keyword, location_id, year FROM salary_data")?;
        let keys = stmt
            .query_map([], |row| {
                Ok(NaturalKey {
                    career_keyword: row.get(0)?,
                    location_id: row.get(1)?,
                    year: row.get(2)?,
                })
            })?
            .filter_map(log_row_error)
            .collect();
        Ok(keys)
    }

    /// SalaryData for a career at a Location (`None` = national) in a year.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn get_salary(
        &self,
        career_keyword: &str,
        location_id: Option<&str>,
        year: i32,
    ) -> Result<Option<SalaryData>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {SALARY_COLUMNS} FROM salary_data
             WHERE career_keyword = ?1 AND COALESCE(location_id, '') = COALESCE(?2, '') AND year = ?3"
        );
        let salary = conn
            .query_row(&sql, params![career_keyword, location_id, year], Self::row_to_salary)
            .optional()?;
        Ok(salary)
    }

    /// Number of stored SalaryData rows.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn count_salaries(&self) -> Result<u64, StorageError> {
        let conn = get_conn(&self.pool)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM salary_data", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub(crate) fn row_to_salary(row: &rusqlite::Row<'_>) -> rusqlite::Result<SalaryData> {
        Ok(SalaryData {
            career_keyword: row.get(0)?,
            location_id: row.get(1)?,
            year: row.get(2)?,
            wages: WageFigures {
                hourly_10th: row.get(3)?,
                hourly_25th: row.get(4)?,
                hourly_median: row.get(5)?,
                hourly_75th: row.get(6)?,
                hourly_90th: row.get(7)?,
                hourly_mean: row.get(8)?,
                annual_10th: row.get(9)?,
                annual_25th: row.get(10)?,
                annual_median: row.get(11)?,
                annual_75th: row.get(12)?,
                annual_90th: row.get(13)?,
                annual_mean: row.get(14)?,
            },
            employment_count: row.get(15)?,
            jobs_per_1000: row.get(16)?,
            location_quotient: row.get(17)?,
            mean_error_margin: row.get(18)?,
            emp_error_margin: row.get(19)?,
            source: row.get(20)?,
        })
    }
}
