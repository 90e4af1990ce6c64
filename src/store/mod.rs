//! Favorites storage
//!
//! The saved places, in insertion order, persisted as a single JSON array
//! under one record key. A missing or unreadable record loads as an empty
//! collection; a failed write is logged and the in-memory list stays
//! authoritative for the session.

pub mod backend;

use crate::category::Category;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::state::SelectionCandidate;
use backend::RecordStorage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Opaque identity of a saved place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(Uuid);

impl PlaceId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PlaceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::Validation(format!("Invalid place id: {}", s)))
    }
}

/// A saved favorite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Place {
    pub(crate) fn new(coords: Coordinates, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: PlaceId::generate(),
            lat: coords.lat,
            lng: coords.lng,
            name: name.into(),
            category,
            created_at: Utc::now(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Durable, ordered collection of favorites
pub struct FavoritesStore {
    places: Vec<Place>,
    storage: Box<dyn RecordStorage>,
    key: String,
    synced: bool,
}

impl FavoritesStore {
    /// Load favorites stored under `key`
    ///
    /// Never fails: a missing, unreadable or corrupt record yields an empty
    /// store.
    pub fn open(storage: Box<dyn RecordStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let places = match storage.read(&key) {
            Ok(Some(content)) => match serde_json::from_str::<Vec<Place>>(&content) {
                Ok(places) => {
                    debug!("Loaded {} favorites from {:?}", places.len(), key);
                    places
                }
                Err(e) => {
                    warn!("Favorites record {:?} is corrupt, starting empty: {}", key, e);
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No favorites record {:?} yet", key);
                Vec::new()
            }
            Err(e) => {
                warn!("Could not read favorites record {:?}, starting empty: {}", key, e);
                Vec::new()
            }
        };

        Self {
            places,
            storage,
            key,
            synced: true,
        }
    }

    /// Save `candidate` as a new favorite
    ///
    /// The trimmed name must be non-empty; on rejection nothing changes.
    pub fn add(&mut self, candidate: &SelectionCandidate, name: &str, category: Category) -> Result<Place> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Place name cannot be empty".to_string()));
        }

        let mut place = Place::new(candidate.coordinates(), name, category);
        while self.get(&place.id).is_some() {
            place.id = PlaceId::generate();
        }

        self.places.push(place.clone());
        info!("Saved favorite {} ({:?}, {})", place.id, place.name, place.category);
        self.persist();
        Ok(place)
    }

    /// Remove a favorite; absent ids are a no-op
    pub fn remove(&mut self, id: &PlaceId) -> Option<Place> {
        let idx = self.places.iter().position(|p| p.id == *id)?;
        let removed = self.places.remove(idx);
        info!("Removed favorite {} ({:?})", removed.id, removed.name);
        self.persist();
        Some(removed)
    }

    /// All favorites, insertion order
    pub fn list(&self) -> &[Place] {
        &self.places
    }

    pub fn get(&self, id: &PlaceId) -> Option<&Place> {
        self.places.iter().find(|p| p.id == *id)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// False after a write failed and until the next one succeeds
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    fn persist(&mut self) {
        let result = serde_json::to_string_pretty(&self.places)
            .map_err(Error::from)
            .and_then(|content| self.storage.write(&self.key, &content));

        self.synced = match result {
            Ok(()) => true,
            Err(e) => {
                warn!("Favorites kept in memory only, write failed: {}", e);
                false
            }
        };
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("key", &self.key)
            .field("places", &self.places)
            .field("synced", &self.synced)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::{FileStorage, MemoryStorage};
    use std::collections::HashSet;
    use tempfile::TempDir;

    const KEY: &str = "favorites-storage";

    /// Storage whose writes always fail
    struct ReadOnlyStorage;

    impl RecordStorage for ReadOnlyStorage {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("disk full".to_string()))
        }
    }

    fn candidate(lat: f64, lng: f64) -> SelectionCandidate {
        SelectionCandidate::new(Coordinates::new(lat, lng), "")
    }

    fn create_test_store() -> (FavoritesStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        let store = FavoritesStore::open(Box::new(storage.clone()), KEY);
        (store, storage)
    }

    #[test]
    fn test_empty_store() {
        let (store, _) = create_test_store();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_add_trims_and_persists() {
        let (mut store, storage) = create_test_store();

        let place = store.add(&candidate(10.0, 20.0), "  Home  ", Category::Home).unwrap();

        assert_eq!(place.name, "Home");
        assert_eq!(place.category, Category::Home);
        assert_eq!(store.list(), &[place.clone()]);

        let record = storage.read(KEY).unwrap().unwrap();
        assert!(record.contains("\"Home\""));
        assert!(store.is_synced());
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let (mut store, storage) = create_test_store();

        let result = store.add(&candidate(10.0, 20.0), "   ", Category::General);

        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(store.is_empty());
        assert!(storage.read(KEY).unwrap().is_none());
    }

    #[test]
    fn test_ids_unique_across_add_remove() {
        let (mut store, _) = create_test_store();
        let mut seen = HashSet::new();

        for i in 0..50 {
            let place = store.add(&candidate(i as f64, 0.0), "p", Category::General).unwrap();
            assert!(seen.insert(place.id), "duplicate id {}", place.id);
            if i % 3 == 0 {
                store.remove(&place.id);
            }
        }
    }

    #[test]
    fn test_insertion_order() {
        let (mut store, _) = create_test_store();
        for name in ["a", "b", "c"] {
            store.add(&candidate(0.0, 0.0), name, Category::General).unwrap();
        }
        let names: Vec<_> = store.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut store, _) = create_test_store();
        let place = store.add(&candidate(1.0, 2.0), "Gym", Category::Leisure).unwrap();

        assert_eq!(store.remove(&place.id).map(|p| p.name), Some("Gym".to_string()));
        assert!(store.remove(&place.id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_and_reload_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        let id = {
            let mut store = FavoritesStore::open(Box::new(storage.clone()), KEY);
            store.add(&candidate(-18.9, -48.2), "Office", Category::Work).unwrap().id
        };

        let store = FavoritesStore::open(Box::new(storage), KEY);
        assert_eq!(store.len(), 1);
        let place = store.get(&id).unwrap();
        assert_eq!(place.category, Category::Work);
        assert_eq!(place.coordinates(), Coordinates::new(-18.9, -48.2));
    }

    #[test]
    fn test_corrupt_record_loads_empty() {
        let storage = MemoryStorage::new().with_record(KEY, "{not json");
        let store = FavoritesStore::open(Box::new(storage), KEY);
        assert!(store.is_empty());
    }

    #[test]
    fn test_record_ignores_unknown_fields() {
        let record = r#"[{
            "id": "6f1c1b1e-8d4a-4c3e-9a4f-2b1d6a7e9c10",
            "lat": 1.5,
            "lng": 2.5,
            "name": "Cafe",
            "category": "teahouse",
            "rating": 5
        }]"#;
        let storage = MemoryStorage::new().with_record(KEY, record);
        let store = FavoritesStore::open(Box::new(storage), KEY);

        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].category, Category::General);
        assert_eq!(store.list()[0].name, "Cafe");
    }

    #[test]
    fn test_write_failure_keeps_memory() {
        let mut store = FavoritesStore::open(Box::new(ReadOnlyStorage), KEY);

        let place = store.add(&candidate(1.0, 1.0), "Kept", Category::General).unwrap();

        assert!(!store.is_synced());
        assert_eq!(store.get(&place.id).map(|p| p.name.as_str()), Some("Kept"));
    }

    #[test]
    fn test_place_id_parse() {
        let (mut store, _) = create_test_store();
        let place = store.add(&candidate(0.0, 0.0), "x", Category::General).unwrap();

        let parsed: PlaceId = place.id.to_string().parse().unwrap();
        assert_eq!(parsed, place.id);
        assert!("42".parse::<PlaceId>().is_err());
    }
}
