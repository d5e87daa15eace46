//! MRT Food - restaurant ranking, filtering and favorites around Taipei MRT stations
//!
//! This library scores the places a maps provider returns around a station,
//! filters and orders them, and keeps the user's favorites, preferences and
//! search history in local storage.

pub mod config;
pub mod core;
pub mod models;
pub mod services;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use crate::core::{calculate_smart_score, filter_candidates, ResultRanker};
pub use models::{
    Candidate, Coordinates, FavoriteEntry, FilterCriteria, PreferenceSet, PriceFilterRange,
    ScoredCandidate, ScoringWeights, SearchOutcome, SearchRequest, SortMode,
};
pub use session::{NavigationError, SearchError, SearchSession, SearchTicket, SessionOptions};
pub use store::{FavoritesStore, PreferenceStore, SearchHistory};
