use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::FavoriteEntry;
use crate::services::storage::KeyValueStorage;

/// Storage key of the favorites list
pub const FAVORITES_KEY: &str = "favorites";

/// Saved places in insertion order, with a place id index
///
/// The index is rebuilt after every load and mutation, so it always agrees
/// with the list once a public method returns.
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStorage>,
    entries: Vec<FavoriteEntry>,
    index: HashMap<String, usize>,
}

impl FavoritesStore {
    /// Create an empty store without reading storage
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create a store populated from storage
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let mut store = Self::new(storage);
        store.load_from_persistence();
        store
    }

    /// Replace the in-memory list with the persisted one
    ///
    /// Malformed or non-list content resets to an empty list. Elements that
    /// are not valid entries are skipped, and a repeated place id keeps its
    /// first occurrence.
    pub fn load_from_persistence(&mut self) {
        self.entries = match self.storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => parse_entries(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read favorites, starting empty: {}", e);
                Vec::new()
            }
        };
        self.rebuild_index();

        tracing::debug!("Loaded {} favorites", self.entries.len());
    }

    pub fn is_favorited(&self, place_id: &str) -> bool {
        self.index.contains_key(place_id)
    }

    pub fn get(&self, place_id: &str) -> Option<&FavoriteEntry> {
        self.index.get(place_id).map(|&i| &self.entries[i])
    }

    /// Add an entry; returns `false` if it was already saved or has no id
    pub fn add(&mut self, entry: FavoriteEntry) -> bool {
        if entry.place_id.is_empty() {
            tracing::warn!("Ignoring favorite without place id: {}", entry.name);
            return false;
        }
        if self.is_favorited(&entry.place_id) {
            return false;
        }

        self.entries.push(entry);
        self.rebuild_index();
        self.persist();
        true
    }

    /// Remove an entry; returns `false` if it was not saved
    pub fn remove(&mut self, place_id: &str) -> bool {
        if !self.is_favorited(place_id) {
            return false;
        }

        self.entries.retain(|e| e.place_id != place_id);
        self.rebuild_index();
        self.persist();
        true
    }

    /// Flip the saved state of an entry; returns whether it is now saved
    pub fn toggle(&mut self, entry: FavoriteEntry) -> bool {
        if self.is_favorited(&entry.place_id) {
            self.remove(&entry.place_id);
            false
        } else {
            self.add(entry)
        }
    }

    pub fn list(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.place_id.clone(), i))
            .collect();
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(Into::into)
            .and_then(|json| self.storage.set(FAVORITES_KEY, &json));

        if let Err(e) = result {
            tracing::error!("Failed to save favorites: {}", e);
        }
    }
}

fn parse_entries(raw: &str) -> Vec<FavoriteEntry> {
    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!("Stored favorites are not a list, resetting");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("Stored favorites are corrupt, resetting: {}", e);
            return Vec::new();
        }
    };

    let mut entries: Vec<FavoriteEntry> = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<FavoriteEntry>(item) {
            Ok(entry) if entry.place_id.is_empty() => {}
            Ok(entry) => {
                if !entries.iter().any(|e| e.place_id == entry.place_id) {
                    entries.push(entry);
                }
            }
            Err(e) => tracing::warn!("Skipping invalid favorite: {}", e),
        }
    }
    entries
}
