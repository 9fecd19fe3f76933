use std::collections::HashMap;

use chrono::Utc;
use oews_atlas_core::constants::MAX_QUERY_LIMIT;
use oews_atlas_core::{Location, LocationKey, NewLocation};
use rusqlite::{OptionalExtension as _, params};

use super::{Storage, get_conn, log_row_error, parse_timestamp};
use crate::error::StorageError;

const LOCATION_COLUMNS: &str = "id, city, state, state_name, slug, created_at";

impl Storage {
    /// Bulk-insert Locations in one transaction, skipping any whose id or
    /// `(city, state)` already exists.
    ///
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    /// Returns error if the transaction fails; no row of the batch is kept.
    pub fn insert_locations(&self, locations: &[NewLocation]) -> Result<usize, StorageError> {
        if locations.is_empty() {
            return Ok(0);
        }
        let mut conn = get_conn(&self.pool)?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO locations (id, city, state, state_name, slug, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for loc in locations {
                inserted += stmt.execute(params![
                    loc.id,
                    loc.city,
                    loc.state,
                    loc.state_name,
                    loc.slug,
                    now
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(batch = locations.len(), inserted, "Location batch written");
        Ok(inserted)
    }

    /// Stored ids for the given keys; keys with no row are absent from the map.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn location_ids_for(
        &self,
        keys: &[LocationKey],
    ) -> Result<HashMap<LocationKey, String>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let mut stmt =
            conn.prepare_cached("SELECT id FROM locations WHERE city = ?1 AND state = ?2")?;
        let mut ids = HashMap::with_capacity(keys.len());
        for key in keys {
            let id: Option<String> =
                stmt.query_row(params![key.city, key.state], |row| row.get(0)).optional()?;
            if let Some(id) = id {
                ids.insert(key.clone(), id);
            }
        }
        Ok(ids)
    }

    /// Id of the Location for `(city, state)`, if stored.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn find_location_id(&self, city: &str, state: &str) -> Result<Option<String>, StorageError> {
        let key = LocationKey::new(city, state);
        let conn = get_conn(&self.pool)?;
        let id = conn
            .query_row(
                "SELECT id FROM locations WHERE city = ?1 AND state = ?2",
                params![key.city, key.state],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Every stored `(city, state)` with its id.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn load_location_index(&self) -> Result<HashMap<LocationKey, String>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare("SELECT city, state, id FROM locations")?;
        let index = stmt
            .query_map([], |row| {
                let city: String = row.get(0)?;
                let state: String = row.get(1)?;
                Ok((LocationKey::new(city, state), row.get::<_, String>(2)?))
            })?
            .filter_map(log_row_error)
            .collect();
        Ok(index)
    }

    /// Location by slug. Slugs are not unique; the oldest row wins.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn get_location_by_slug(&self, slug: &str) -> Result<Option<Location>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {LOCATION_COLUMNS} FROM locations WHERE slug = ?1 ORDER BY created_at, id LIMIT 1"
        );
        let location = conn.query_row(&sql, params![slug], Self::row_to_location).optional()?;
        Ok(location)
    }

    /// Locations ordered by state then city, optionally limited to one state.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn list_locations(&self, state: Option<&str>) -> Result<Vec<Location>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let limit = MAX_QUERY_LIMIT as i64;
        let locations = if let Some(state) = state {
            let sql = format!(
                "SELECT {LOCATION_COLUMNS} FROM locations WHERE state = ?1
                 ORDER BY state, city LIMIT ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            stmt.query_map(params![state.trim().to_ascii_uppercase(), limit], Self::row_to_location)?
                .filter_map(log_row_error)
                .collect()
        } else {
            let sql =
                format!("SELECT {LOCATION_COLUMNS} FROM locations ORDER BY state, city LIMIT ?1");
            let mut stmt = conn.prepare(&sql)?;
            stmt.query_map(params![limit], Self::row_to_location)?.filter_map(log_row_error).collect()
        };
        Ok(locations)
    }

    pub(crate) fn row_to_location(row: &rusqlite::Row<'_>) -> rusqlite::Result<Location> {
        let created_at: String = row.get(5)?;
        Ok(Location {
            id: row.get(0)?,
            city: row.get(1)?,
            state: row.get(2)?,
            state_name: row.get(3)?,
            slug: row.get(4)?,
            created_at: parse_timestamp(5, &created_at)?,
        })
    }
}
