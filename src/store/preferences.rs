use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::models::domain::{MAX_FOOD_TYPE_LEN, MAX_PRICE_LEVEL, MAX_RADIUS_M, MIN_RADIUS_M};
use crate::models::{PreferenceSet, SortMode};
use crate::services::storage::{KeyValueStorage, StorageError};

/// A typed preference slot
///
/// Each key owns its storage name, value type and default, so a read can
/// never return a value of the wrong shape.
pub trait PreferenceKey {
    const KEY: &'static str;
    type Value: Serialize + DeserializeOwned;

    fn default_value() -> Self::Value;

    /// Stored values failing this check are treated as corrupt
    fn is_valid(_value: &Self::Value) -> bool {
        true
    }
}

/// Search radius in meters
pub struct Radius;

/// Price level preset for [`crate::models::PriceFilterRange::from_level`]
pub struct PriceLevel;

pub struct Sort;

pub struct OpenNowOnly;

/// Category filter, empty for any
pub struct FoodType;

impl PreferenceKey for Radius {
    const KEY: &'static str = "pref.radius";
    type Value = u32;

    fn default_value() -> u32 {
        PreferenceSet::default().radius
    }

    fn is_valid(value: &u32) -> bool {
        (MIN_RADIUS_M..=MAX_RADIUS_M).contains(value)
    }
}

impl PreferenceKey for PriceLevel {
    const KEY: &'static str = "pref.priceLevel";
    type Value = i64;

    fn default_value() -> i64 {
        PreferenceSet::default().price_level
    }

    fn is_valid(value: &i64) -> bool {
        (0..=MAX_PRICE_LEVEL).contains(value)
    }
}

impl PreferenceKey for Sort {
    const KEY: &'static str = "pref.sortMode";
    type Value = SortMode;

    fn default_value() -> SortMode {
        SortMode::default()
    }
}

impl PreferenceKey for OpenNowOnly {
    const KEY: &'static str = "pref.openNowOnly";
    type Value = bool;

    fn default_value() -> bool {
        false
    }
}

impl PreferenceKey for FoodType {
    const KEY: &'static str = "pref.foodType";
    type Value = String;

    fn default_value() -> String {
        String::new()
    }

    fn is_valid(value: &String) -> bool {
        value.chars().count() <= MAX_FOOD_TYPE_LEN
    }
}

/// Persistent user preferences, one storage key per setting
pub struct PreferenceStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl PreferenceStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read one preference, falling back to its default when missing or corrupt
    pub fn get<K: PreferenceKey>(&self) -> K::Value {
        let raw = match self.storage.get(K::KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return K::default_value(),
            Err(e) => {
                tracing::warn!("Failed to read preference {}: {}", K::KEY, e);
                return K::default_value();
            }
        };

        match parse_value::<K::Value>(&raw).filter(K::is_valid) {
            Some(value) => value,
            None => {
                tracing::warn!("Preference {} is corrupt, using default: {:?}", K::KEY, raw);
                K::default_value()
            }
        }
    }

    /// Write one preference immediately
    pub fn set<K: PreferenceKey>(&self, value: &K::Value) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.storage.set(K::KEY, &json)
    }

    /// Whether a value has been stored for this preference
    pub fn is_set<K: PreferenceKey>(&self) -> bool {
        matches!(self.storage.get(K::KEY), Ok(Some(_)))
    }

    /// Reset one preference to its default
    pub fn reset<K: PreferenceKey>(&self) -> Result<(), StorageError> {
        self.storage.remove(K::KEY)
    }

    /// Restore every preference; each key falls back independently
    pub fn load(&self) -> PreferenceSet {
        PreferenceSet {
            radius: self.get::<Radius>(),
            price_level: self.get::<PriceLevel>(),
            sort_mode: self.get::<Sort>(),
            open_now_only: self.get::<OpenNowOnly>(),
            food_type: self.get::<FoodType>(),
        }
    }

    pub fn save(&self, preferences: &PreferenceSet) -> Result<(), StorageError> {
        self.set::<Radius>(&preferences.radius)?;
        self.set::<PriceLevel>(&preferences.price_level)?;
        self.set::<Sort>(&preferences.sort_mode)?;
        self.set::<OpenNowOnly>(&preferences.open_now_only)?;
        self.set::<FoodType>(&preferences.food_type)?;

        tracing::debug!("Saved preferences: {:?}", preferences);
        Ok(())
    }
}

/// Decode a stored value. Form controls used to store numbers and flags as
/// quoted strings (`"800"`), so a JSON string is unwrapped once more.
fn parse_value<T: DeserializeOwned>(raw: &str) -> Option<T> {
    if let Ok(value) = serde_json::from_str::<T>(raw) {
        return Some(value);
    }

    let inner = serde_json::from_str::<String>(raw).ok()?;
    serde_json::from_str::<T>(&inner)
        .or_else(|_| serde_json::from_value::<T>(serde_json::Value::String(inner)))
        .ok()
}
