//! Location Resolver: (city, state) → Location id, creating on first sight.
//!
//! The key → id cache is bulk-loaded once and grows as new keys are seen.
//! New Locations get deterministic ids and wait in `pending` until the next
//! flush writes them with skip-duplicates, so two writers racing on one key
//! degrade to a no-op rather than a second row.

use std::collections::HashMap;
use std::sync::Arc;

use oews_atlas_core::{LocationKey, NewLocation, state_display_name};
use oews_atlas_storage::{LocationStore, StorageError};

pub struct LocationResolver<S: ?Sized> {
    store: Arc<S>,
    cache: HashMap<LocationKey, String>,
    pending: Vec<NewLocation>,
}

impl<S: LocationStore + ?Sized> LocationResolver<S> {
    /// Resolver with an empty cache; every first lookup of a key goes to the store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store, cache: HashMap::new(), pending: Vec::new() }
    }

    /// Resolver whose cache holds every Location already stored.
    pub async fn preload(store: Arc<S>) -> Result<Self, StorageError> {
        let cache = store.load_location_index().await?;
        tracing::info!(locations = cache.len(), "Loaded existing locations");
        Ok(Self { store, cache, pending: Vec::new() })
    }

    /// Id for a city-level Location. `state_name_hint` overrides the
    /// built-in state-name table for a newly created row.
    pub async fn resolve(
        &mut self,
        city: &str,
        state: &str,
        state_name_hint: Option<&str>,
    ) -> Result<String, StorageError> {
        let key = LocationKey::new(city, state);
        let state_name = match state_name_hint {
            Some(hint) if !hint.trim().is_empty() => hint.trim().to_owned(),
            _ => state_display_name(&key.state),
        };
        self.resolve_key(key, &state_name).await
    }

    /// Id for the state-level Location of `code`, named `state_name`.
    pub async fn resolve_state(
        &mut self,
        code: &str,
        state_name: &str,
    ) -> Result<String, StorageError> {
        self.resolve_key(LocationKey::state_level(code), state_name).await
    }

    async fn resolve_key(
        &mut self,
        key: LocationKey,
        state_name: &str,
    ) -> Result<String, StorageError> {
        if let Some(id) = self.cache.get(&key) {
            return Ok(id.clone());
        }
        if let Some(id) = self.store.find_location_id(&key.city, &key.state).await? {
            self.cache.insert(key, id.clone());
            return Ok(id);
        }
        let location = NewLocation::for_key(&key, state_name);
        let id = location.id.clone();
        tracing::debug!(location = %key, id = %id, "New location");
        self.cache.insert(key, id.clone());
        self.pending.push(location);
        Ok(id)
    }

    /// Locations created since the last call, for the bulk writer.
    pub fn take_pending(&mut self) -> Vec<NewLocation> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Adopts the ids the store actually holds for written keys.
    ///
    /// Returns `old id → stored id` for every key whose cached id lost to a
    /// row written by someone else.
    pub fn reconcile(&mut self, stored: &HashMap<LocationKey, String>) -> HashMap<String, String> {
        let mut remapped = HashMap::new();
        for (key, stored_id) in stored {
            if let Some(cached) = self.cache.get_mut(key) {
                if cached != stored_id {
                    tracing::debug!(location = %key, from = %cached, to = %stored_id, "Location id remapped");
                    remapped.insert(std::mem::replace(cached, stored_id.clone()), stored_id.clone());
                }
            } else {
                self.cache.insert(key.clone(), stored_id.clone());
            }
        }
        remapped
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
