//! Location records: one row per (city, state), with an empty city for
//! state-level rows. National scope has no Location row at all.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slug::location_slug;

/// Namespace for deterministic Location ids.
const LOCATION_NAMESPACE: Uuid = Uuid::from_u128(0x6f3c_1a2e_9b4d_4c71_a0f2_58e3_d1b7_c904);

/// The unique (city, state) pair identifying a Location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationKey {
    pub city: String,
    pub state: String,
}

impl LocationKey {
    /// City is trimmed; state is trimmed and upper-cased.
    pub fn new(city: impl AsRef<str>, state: impl AsRef<str>) -> Self {
        Self {
            city: city.as_ref().trim().to_owned(),
            state: state.as_ref().trim().to_ascii_uppercase(),
        }
    }

    /// Key of the state-level row (empty city).
    pub fn state_level(state: impl AsRef<str>) -> Self {
        Self::new("", state)
    }

    #[must_use]
    pub fn is_state_level(&self) -> bool {
        self.city.is_empty()
    }

    /// Deterministic id: every writer derives the same id for the same key.
    #[must_use]
    pub fn location_id(&self) -> String {
        let name = format!("{}|{}", self.city, self.state);
        Uuid::new_v5(&LOCATION_NAMESPACE, name.as_bytes()).to_string()
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_state_level() {
            write!(f, "{}", self.state)
        } else {
            write!(f, "{}, {}", self.city, self.state)
        }
    }
}

/// A persisted Location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub city: String,
    pub state: String,
    pub state_name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl Location {
    #[must_use]
    pub fn key(&self) -> LocationKey {
        LocationKey::new(&self.city, &self.state)
    }

    #[must_use]
    pub fn is_state_level(&self) -> bool {
        self.city.is_empty()
    }
}

/// A Location waiting to be written by the bulk writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLocation {
    pub id: String,
    pub city: String,
    pub state: String,
    pub state_name: String,
    pub slug: String,
}

impl NewLocation {
    /// Builds the row for `key`, synthesizing its id and slug.
    /// A blank `state_name` falls back to the state code.
    #[must_use]
    pub fn for_key(key: &LocationKey, state_name: &str) -> Self {
        let state_name =
            if state_name.trim().is_empty() { key.state.clone() } else { state_name.trim().to_owned() };
        Self {
            id: key.location_id(),
            slug: location_slug(&key.city, &key.state, &state_name),
            city: key.city.clone(),
            state: key.state.clone(),
            state_name,
        }
    }

    #[must_use]
    pub fn key(&self) -> LocationKey {
        LocationKey::new(&self.city, &self.state)
    }
}
