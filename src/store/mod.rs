// Local persistence of favorites, preferences and search history
pub mod favorites;
pub mod history;
pub mod preferences;

pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use history::{SearchHistory, HISTORY_KEY, MAX_HISTORY};
pub use preferences::{PreferenceKey, PreferenceStore};
