use std::sync::Arc;

use crate::services::storage::KeyValueStorage;

/// Storage key of the station history
pub const HISTORY_KEY: &str = "search.history";

/// Maximum number of remembered stations
pub const MAX_HISTORY: usize = 10;

/// Recently searched stations, most recent first
pub struct SearchHistory {
    storage: Arc<dyn KeyValueStorage>,
}

impl SearchHistory {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Stored history, empty when missing or corrupt
    pub fn list(&self) -> Vec<String> {
        let raw = match self.storage.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read search history: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(stations) => stations,
            Err(e) => {
                tracing::warn!("Search history is corrupt, resetting: {}", e);
                Vec::new()
            }
        }
    }

    /// Move `station` to the front, dropping duplicates and the overflow
    pub fn save(&self, station: &str) -> Vec<String> {
        let station = station.trim();
        if station.is_empty() {
            return self.list();
        }

        let mut stations = self.list();
        stations.retain(|s| s != station);
        stations.insert(0, station.to_string());
        stations.truncate(MAX_HISTORY);

        let result = serde_json::to_string(&stations)
            .map_err(Into::into)
            .and_then(|json| self.storage.set(HISTORY_KEY, &json));
        if let Err(e) = result {
            tracing::error!("Failed to save search history: {}", e);
        }

        stations
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(HISTORY_KEY) {
            tracing::error!("Failed to clear search history: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryStorage;

    #[test]
    fn test_move_to_front() {
        let history = SearchHistory::new(Arc::new(MemoryStorage::new()));

        history.save("A");
        assert_eq!(history.save("B"), vec!["B", "A"]);
        assert_eq!(history.save("A"), vec!["A", "B"]);
        assert_eq!(history.list(), vec!["A", "B"]);
    }

    #[test]
    fn test_bounded() {
        let history = SearchHistory::new(Arc::new(MemoryStorage::new()));
        for i in 0..15 {
            history.save(&format!("station {}", i));
        }

        let stations = history.list();
        assert_eq!(stations.len(), MAX_HISTORY);
        assert_eq!(stations[0], "station 14");
        assert_eq!(stations[9], "station 5");
    }

    #[test]
    fn test_corrupt_history_resets() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(HISTORY_KEY, "{\"oops\":1}").unwrap();

        let history = SearchHistory::new(storage);
        assert!(history.list().is_empty());
        assert_eq!(history.save("中山"), vec!["中山"]);
    }

    #[test]
    fn test_clear() {
        let history = SearchHistory::new(Arc::new(MemoryStorage::new()));
        history.save("A");
        history.clear();
        assert!(history.list().is_empty());
    }
}
