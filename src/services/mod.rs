// Service exports
pub mod cache;
pub mod google;
pub mod provider;
pub mod storage;
pub mod synthetic;

pub use cache::{CacheKey, CacheStats, CachingProvider};
pub use google::GooglePlacesClient;
pub use provider::{
    LocationRequest, NearbyQuery, PlaceDetails, PlacesProvider, ProviderError, RouteSummary,
    UnavailableProvider,
};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
