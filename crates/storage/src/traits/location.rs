use std::collections::HashMap;

use async_trait::async_trait;
use oews_atlas_core::{Location, LocationKey, NewLocation};

use crate::error::StorageError;

/// Location persistence and lookups.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Bulk insert, skipping existing keys. Returns rows inserted.
    async fn insert_locations(&self, locations: &[NewLocation]) -> Result<usize, StorageError>;

    /// Stored ids for the given keys.
    async fn location_ids_for(
        &self,
        keys: &[LocationKey],
    ) -> Result<HashMap<LocationKey, String>, StorageError>;

    /// Id for a single `(city, state)`.
    async fn find_location_id(
        &self,
        city: &str,
        state: &str,
    ) -> Result<Option<String>, StorageError>;

    /// Every stored key with its id.
    async fn load_location_index(&self) -> Result<HashMap<LocationKey, String>, StorageError>;

    async fn get_location_by_slug(&self, slug: &str) -> Result<Option<Location>, StorageError>;

    async fn list_locations(&self, state: Option<&str>) -> Result<Vec<Location>, StorageError>;
}
