use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::distance::meters_between;
use crate::models::{Candidate, Coordinates, PriceFilterRange, TravelMode};

/// Errors reported by a places provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Places provider unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Provider returned zero results")]
    ZeroResults,

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }
}

/// Parameters of a nearby search
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub point: Coordinates,
    pub radius_m: u32,
    pub category: Option<String>,
    pub open_now: bool,
    pub price_range: Option<PriceFilterRange>,
}

/// Extended place information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub formatted_address: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
}

/// Human readable route summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub distance_text: String,
    pub duration_text: String,
}

/// Device location request options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationRequest {
    pub timeout_ms: u64,
    pub high_accuracy: bool,
    /// Accept a previously cached position
    pub allow_cached: bool,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            high_accuracy: true,
            allow_cached: false,
        }
    }
}

/// Capability interface over the mapping / places service.
///
/// Calls are request/response; callers that care about superseded searches
/// discard late answers themselves.
#[allow(async_fn_in_trait)]
pub trait PlacesProvider {
    /// Resolve a free-text query to a point
    async fn geocode(&self, query: &str) -> Result<Coordinates, ProviderError>;

    /// Places around a point. `ZeroResults` is reported distinctly from failure.
    async fn search_nearby(&self, query: &NearbyQuery) -> Result<Vec<Candidate>, ProviderError>;

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, ProviderError>;

    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        mode: TravelMode,
    ) -> Result<RouteSummary, ProviderError>;

    async fn current_location(
        &self,
        request: &LocationRequest,
    ) -> Result<Coordinates, ProviderError>;

    /// Distance in meters between two points
    fn compute_distance(&self, a: Coordinates, b: Coordinates) -> f64 {
        meters_between(a, b)
    }

    /// Displayable URL for a stored photo link
    ///
    /// Stored links carry no credentials; providers that need them add them here.
    fn photo_url(&self, stored: &str) -> String {
        stored.to_string()
    }
}

/// Provider used when no API key is configured; every lookup is unavailable
#[derive(Debug, Clone, Default)]
pub struct UnavailableProvider {
    reason: String,
}

impl UnavailableProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> ProviderError {
        ProviderError::Unavailable(self.reason.clone())
    }
}

impl PlacesProvider for UnavailableProvider {
    async fn geocode(&self, _query: &str) -> Result<Coordinates, ProviderError> {
        Err(self.error())
    }

    async fn search_nearby(&self, _query: &NearbyQuery) -> Result<Vec<Candidate>, ProviderError> {
        Err(self.error())
    }

    async fn place_details(&self, _place_id: &str) -> Result<PlaceDetails, ProviderError> {
        Err(self.error())
    }

    async fn route(
        &self,
        _origin: Coordinates,
        _destination: Coordinates,
        _mode: TravelMode,
    ) -> Result<RouteSummary, ProviderError> {
        Err(self.error())
    }

    async fn current_location(
        &self,
        _request: &LocationRequest,
    ) -> Result<Coordinates, ProviderError> {
        Err(self.error())
    }
}
