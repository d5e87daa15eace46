use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::{Candidate, Coordinates, TravelMode};
use crate::services::provider::{
    LocationRequest, NearbyQuery, PlaceDetails, PlacesProvider, ProviderError, RouteSummary,
};

/// Caching wrapper around a places provider
///
/// Geocode and nearby-search answers are kept in an in-memory cache for the
/// configured TTL, so flipping back and forth between stations does not
/// re-query the provider. Errors are never cached.
pub struct CachingProvider<P> {
    inner: P,
    geocodes: moka::future::Cache<String, Coordinates>,
    nearby: moka::future::Cache<String, Vec<Candidate>>,
}

impl<P: PlacesProvider> CachingProvider<P> {
    /// Create a new caching provider
    pub fn new(inner: P, capacity: u64, ttl_secs: u64) -> Self {
        let ttl = Duration::from_secs(ttl_secs);

        Self {
            inner,
            geocodes: moka::future::CacheBuilder::new(capacity)
                .time_to_live(ttl)
                .build(),
            nearby: moka::future::CacheBuilder::new(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Drop every cached answer
    pub fn invalidate_all(&self) {
        self.geocodes.invalidate_all();
        self.nearby.invalidate_all();
        tracing::debug!("Invalidated provider cache");
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            geocode_entries: self.geocodes.entry_count(),
            nearby_entries: self.nearby.entry_count(),
        }
    }
}

impl<P: PlacesProvider> PlacesProvider for CachingProvider<P> {
    async fn geocode(&self, query: &str) -> Result<Coordinates, ProviderError> {
        let key = CacheKey::geocode(query);
        if let Some(point) = self.geocodes.get(&key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(point);
        }

        let point = self.inner.geocode(query).await?;
        self.geocodes.insert(key, point).await;
        Ok(point)
    }

    async fn search_nearby(&self, query: &NearbyQuery) -> Result<Vec<Candidate>, ProviderError> {
        let key = CacheKey::nearby(query);
        if let Some(candidates) = self.nearby.get(&key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(candidates);
        }

        let candidates = self.inner.search_nearby(query).await?;
        self.nearby.insert(key, candidates.clone()).await;
        Ok(candidates)
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, ProviderError> {
        self.inner.place_details(place_id).await
    }

    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        mode: TravelMode,
    ) -> Result<RouteSummary, ProviderError> {
        self.inner.route(origin, destination, mode).await
    }

    async fn current_location(
        &self,
        request: &LocationRequest,
    ) -> Result<Coordinates, ProviderError> {
        self.inner.current_location(request).await
    }

    fn compute_distance(&self, a: Coordinates, b: Coordinates) -> f64 {
        self.inner.compute_distance(a, b)
    }

    fn photo_url(&self, stored: &str) -> String {
        self.inner.photo_url(stored)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub geocode_entries: u64,
    pub nearby_entries: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a geocode query
    pub fn geocode(query: &str) -> String {
        format!("geocode:{}", query.trim())
    }

    /// Build a cache key for a nearby search
    pub fn nearby(query: &NearbyQuery) -> String {
        let price = query
            .price_range
            .map(|r| format!("{}-{}", r.min_tier, r.max_tier))
            .unwrap_or_else(|| "any".to_string());

        format!(
            "nearby:{:.6},{:.6}:{}:{}:{}:{}",
            query.point.lat,
            query.point.lng,
            query.radius_m,
            query.category.as_deref().unwrap_or("any"),
            query.open_now,
            price
        )
    }
}
