//! The search session: one user's current station, results and saved state.
//!
//! A search runs in three steps so a slow provider answer can never overwrite
//! a newer one:
//! 1. [`SearchSession::begin_search`] validates the request and issues a
//!    [`SearchTicket`] stamped with the next generation
//! 2. [`SearchTicket::run`] talks to the provider without borrowing the session
//! 3. [`SearchSession::apply`] installs the outcome only if its generation is
//!    still the current one

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::config::Settings;
use crate::core::ranker::ResultRanker;
use crate::models::labels::DEFAULT_CATEGORY;
use crate::models::{
    Candidate, Coordinates, FavoriteEntry, FilterCriteria, PreferenceSet, ResultSource,
    ScoredCandidate, ScoringWeights, SearchOutcome, SearchRequest, SortMode, TravelMode,
};
use crate::services::provider::{
    LocationRequest, NearbyQuery, PlaceDetails, PlacesProvider, ProviderError, RouteSummary,
};
use crate::services::storage::KeyValueStorage;
use crate::services::synthetic::{self, is_synthetic_id};
use crate::store::preferences::Radius;
use crate::store::{FavoritesStore, PreferenceStore, SearchHistory};

/// Notice shown with synthetic results
pub const SYNTHETIC_NOTICE: &str = "目前無法連線至地圖服務，以下為示範資料";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid search request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    #[error("Station not found: {0}")]
    StationNotFound(String),

    #[error("Search superseded by a newer one")]
    Superseded,
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Unknown place: {0}")]
    UnknownPlace(String),

    #[error("Place has no coordinates: {0}")]
    NoCoordinates(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Search behaviour taken from configuration
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub cap: usize,
    pub base_criteria: FilterCriteria,
    pub weights: ScoringWeights,
    pub fallback_center: Coordinates,
    pub geocode_template: String,
    pub walking_speed_m_per_min: f64,
    pub default_radius: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl SessionOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            cap: settings.search.max_results,
            base_criteria: settings.filters.criteria(),
            weights: settings.scoring_weights(),
            fallback_center: settings.search.fallback_center,
            geocode_template: settings.provider.geocode_template.clone(),
            walking_speed_m_per_min: settings.search.walking_speed_m_per_min,
            default_radius: settings.search.default_radius,
        }
    }

    /// Geocode query for a station name
    pub fn geocode_query(&self, station: &str) -> String {
        if self.geocode_template.contains("{station}") {
            self.geocode_template.replace("{station}", station)
        } else {
            station.to_string()
        }
    }
}

/// A search in flight
#[derive(Debug, Clone)]
pub struct SearchTicket {
    pub generation: u64,
    pub request_id: Uuid,
    pub request: SearchRequest,
    criteria: FilterCriteria,
    options: SessionOptions,
}

impl SearchTicket {
    /// Resolve the station and rank what the provider returns
    ///
    /// Only an unknown station is an error. Every other provider failure
    /// produces synthetic results flagged as such.
    pub async fn run<P: PlacesProvider>(&self, provider: &P) -> Result<SearchOutcome, SearchError> {
        let station = &self.request.station;
        let query = self.options.geocode_query(station);

        tracing::info!(
            "Search {} (generation {}): station={} radius={} price={:?} sort={}",
            self.request_id,
            self.generation,
            station,
            self.request.radius,
            self.request.price_range(),
            self.request.sort_mode
        );

        let reference = match provider.geocode(&query).await {
            Ok(point) => point,
            Err(e) if e.is_not_found() => {
                tracing::info!("Station not found: {}", station);
                return Err(SearchError::StationNotFound(station.clone()));
            }
            Err(e) => {
                tracing::warn!("Geocoding {} failed, using synthetic results: {}", station, e);
                return Ok(self.synthetic_outcome(self.options.fallback_center));
            }
        };

        // Price and open-now are filtered locally: places without a price tier
        // survive, and the stored candidates can be re-ranked when open-now changes
        let nearby = NearbyQuery {
            point: reference,
            radius_m: self.request.radius,
            category: Some(self.request.category().unwrap_or(DEFAULT_CATEGORY).to_string()),
            open_now: false,
            price_range: None,
        };

        match provider.search_nearby(&nearby).await {
            Ok(candidates) => Ok(self.outcome(reference, candidates, ResultSource::Live, None)),
            Err(ProviderError::ZeroResults) => {
                tracing::info!("No places near {}", station);
                Ok(self.outcome(reference, Vec::new(), ResultSource::Live, None))
            }
            Err(e) => {
                tracing::warn!(
                    "Nearby search near {} failed, using synthetic results: {}",
                    station,
                    e
                );
                Ok(self.synthetic_outcome(reference))
            }
        }
    }

    fn synthetic_outcome(&self, reference: Coordinates) -> SearchOutcome {
        let candidates = synthetic::generate_candidates(&self.request.station, self.options.cap);
        self.outcome(
            reference,
            candidates,
            ResultSource::Synthetic,
            Some(SYNTHETIC_NOTICE.to_string()),
        )
    }

    fn outcome(
        &self,
        reference: Coordinates,
        candidates: Vec<Candidate>,
        source: ResultSource,
        notice: Option<String>,
    ) -> SearchOutcome {
        let ranked = ResultRanker::new(self.options.weights).rank(
            &candidates,
            reference,
            &self.criteria,
            self.request.sort_mode,
            self.options.cap,
        );

        tracing::info!(
            "Search {} finished: {} of {} places shown ({:?})",
            self.request_id,
            ranked.results.len(),
            ranked.total_candidates,
            source
        );

        SearchOutcome {
            request_id: self.request_id,
            generation: self.generation,
            station: self.request.station.clone(),
            request: self.request.clone(),
            reference,
            candidates,
            results: ranked.results,
            source,
            notice,
        }
    }
}

/// Route from the device to a place
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationPlan {
    pub place_id: String,
    pub name: String,
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub mode: TravelMode,
    /// `None` when the directions lookup failed; `maps_url` still works
    pub route: Option<RouteSummary>,
    pub maps_url: String,
}

struct CurrentSearch {
    outcome: SearchOutcome,
    criteria: FilterCriteria,
    sort_mode: SortMode,
}

/// Single-user search state
pub struct SearchSession {
    options: SessionOptions,
    ranker: ResultRanker,
    preferences: PreferenceSet,
    preference_store: PreferenceStore,
    favorites: FavoritesStore,
    history: SearchHistory,
    generation: u64,
    current: Option<CurrentSearch>,
}

impl SearchSession {
    /// Open a session, restoring favorites and preferences from `storage`
    pub fn new(options: SessionOptions, storage: Arc<dyn KeyValueStorage>) -> Self {
        let preference_store = PreferenceStore::new(storage.clone());
        let mut preferences = preference_store.load();
        if !preference_store.is_set::<Radius>() {
            preferences.radius = options.default_radius;
        }

        Self {
            ranker: ResultRanker::new(options.weights),
            options,
            preferences,
            preference_store,
            favorites: FavoritesStore::load(storage.clone()),
            history: SearchHistory::new(storage),
            generation: 0,
            current: None,
        }
    }

    pub fn from_settings(settings: &Settings, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::new(SessionOptions::from_settings(settings), storage)
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Request for `station` using the current preferences
    pub fn request_for(&self, station: &str) -> SearchRequest {
        SearchRequest::new(station, &self.preferences)
    }

    /// Validate a request and supersede any search in flight
    pub fn begin_search(&mut self, request: SearchRequest) -> Result<SearchTicket, SearchError> {
        let mut request = request;
        request.station = request.station.trim().to_string();
        request.validate()?;

        self.generation += 1;
        self.history.save(&request.station);

        Ok(SearchTicket {
            generation: self.generation,
            request_id: Uuid::new_v4(),
            criteria: request.criteria(&self.options.base_criteria),
            request,
            options: self.options.clone(),
        })
    }

    /// Install an outcome; returns `false` if a newer search has started
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                "Discarding stale search {} (generation {}, current {})",
                outcome.request_id,
                outcome.generation,
                self.generation
            );
            return false;
        }

        let criteria = outcome.request.criteria(&self.options.base_criteria);
        let sort_mode = outcome.request.sort_mode;
        self.current = Some(CurrentSearch {
            outcome,
            criteria,
            sort_mode,
        });
        true
    }

    /// Search `station` with the current preferences and install the result
    pub async fn search<P: PlacesProvider>(
        &mut self,
        provider: &P,
        station: &str,
    ) -> Result<&SearchOutcome, SearchError> {
        let ticket = self.begin_search(self.request_for(station))?;
        let outcome = ticket.run(provider).await?;

        if !self.apply(outcome) {
            return Err(SearchError::Superseded);
        }
        self.outcome().ok_or(SearchError::Superseded)
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.current.as_ref().map(|c| &c.outcome)
    }

    pub fn results(&self) -> &[ScoredCandidate] {
        self.outcome().map(|o| o.results.as_slice()).unwrap_or(&[])
    }

    pub fn station(&self) -> Option<&str> {
        self.outcome().map(|o| o.station.as_str())
    }

    pub fn sort_mode(&self) -> SortMode {
        self.current
            .as_ref()
            .map(|c| c.sort_mode)
            .unwrap_or(self.preferences.sort_mode)
    }

    /// Result shown at `index`
    pub fn result_at(&self, index: usize) -> Option<&ScoredCandidate> {
        self.results().get(index)
    }

    pub fn find_result(&self, place_id: &str) -> Option<&ScoredCandidate> {
        self.results().iter().find(|r| r.id() == place_id)
    }

    pub fn walking_minutes(&self, result: &ScoredCandidate) -> Option<u32> {
        result.walking_minutes(self.options.walking_speed_m_per_min)
    }

    /// Change the ordering without searching again
    pub fn resort(&mut self, sort_mode: SortMode) {
        self.preferences.sort_mode = sort_mode;
        self.persist_preferences();

        if let Some(current) = self.current.as_mut() {
            current.sort_mode = sort_mode;
        }
        self.rerank();
    }

    /// Toggle the open-now filter on the stored candidates
    pub fn set_open_now(&mut self, open_now_only: bool) {
        self.preferences.open_now_only = open_now_only;
        self.persist_preferences();

        if let Some(current) = self.current.as_mut() {
            current.criteria.open_now_only = open_now_only;
        }
        self.rerank();
    }

    /// Rebuild the visible results from the raw candidates
    ///
    /// Truncation happens after sorting, so a different mode may surface
    /// candidates the previous mode had cut.
    fn rerank(&mut self) {
        let cap = self.options.cap;
        if let Some(current) = self.current.as_mut() {
            let outcome = &mut current.outcome;
            let ranked = self.ranker.rank(
                &outcome.candidates,
                outcome.reference,
                &current.criteria,
                current.sort_mode,
                cap,
            );
            outcome.results = ranked.results;
        }
    }

    pub fn preferences(&self) -> &PreferenceSet {
        &self.preferences
    }

    /// Replace the preferences used for the next search
    ///
    /// Invalid settings are rejected before anything is saved.
    pub fn update_preferences(
        &mut self,
        preferences: PreferenceSet,
    ) -> Result<(), validator::ValidationErrors> {
        preferences.validate()?;

        self.preferences = preferences;
        self.persist_preferences();
        Ok(())
    }

    fn persist_preferences(&self) {
        if let Err(e) = self.preference_store.save(&self.preferences) {
            tracing::error!("Failed to save preferences: {}", e);
        }
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn is_favorited(&self, place_id: &str) -> bool {
        self.favorites.is_favorited(place_id)
    }

    /// Flip the saved state of a shown result or a saved favorite
    ///
    /// Returns the new state, or `None` for a place that is neither shown nor saved.
    pub fn toggle_favorite(&mut self, place_id: &str) -> Option<bool> {
        if let Some(result) = self.find_result(place_id) {
            let entry = result.to_favorite(self.station());
            return Some(self.favorites.toggle(entry));
        }

        if self.favorites.remove(place_id) {
            Some(false)
        } else {
            None
        }
    }

    pub fn add_favorite(&mut self, entry: FavoriteEntry) -> bool {
        self.favorites.add(entry)
    }

    pub fn remove_favorite(&mut self, place_id: &str) -> bool {
        self.favorites.remove(place_id)
    }

    pub fn history(&self) -> Vec<String> {
        self.history.list()
    }

    /// Details for a shown result or any provider place
    ///
    /// Synthetic places only exist locally, so they are answered from the
    /// current results.
    pub async fn place_details<P: PlacesProvider>(
        &self,
        provider: &P,
        place_id: &str,
    ) -> Result<PlaceDetails, NavigationError> {
        if is_synthetic_id(place_id) {
            let result = self
                .find_result(place_id)
                .ok_or_else(|| NavigationError::UnknownPlace(place_id.to_string()))?;
            return Ok(PlaceDetails {
                candidate: result.candidate.clone(),
                formatted_address: result.candidate.address.clone(),
                phone_number: None,
                website: None,
            });
        }

        match provider.place_details(place_id).await {
            Ok(details) => Ok(details),
            Err(e) if e.is_not_found() => Err(NavigationError::UnknownPlace(place_id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Plan a route from the device location to a place
    pub async fn navigate<P: PlacesProvider>(
        &self,
        provider: &P,
        place_id: &str,
        mode: TravelMode,
        location: &LocationRequest,
    ) -> Result<NavigationPlan, NavigationError> {
        let (name, destination) = match self.find_result(place_id) {
            Some(result) => (result.candidate.name.clone(), result.candidate.coordinates),
            None => {
                let details = self.place_details(provider, place_id).await?;
                (details.candidate.name, details.candidate.coordinates)
            }
        };
        let destination =
            destination.ok_or_else(|| NavigationError::NoCoordinates(place_id.to_string()))?;

        let origin = match provider.current_location(location).await {
            Ok(origin) => origin,
            Err(ProviderError::PermissionDenied) => {
                tracing::warn!("Location permission denied, cannot navigate to {}", place_id);
                return Err(NavigationError::PermissionDenied);
            }
            Err(e) => return Err(e.into()),
        };

        let route = match provider.route(origin, destination, mode).await {
            Ok(route) => Some(route),
            Err(e) => {
                tracing::warn!("Directions to {} unavailable: {}", place_id, e);
                None
            }
        };

        Ok(NavigationPlan {
            maps_url: directions_url(origin, destination, place_id, mode),
            place_id: place_id.to_string(),
            name,
            origin,
            destination,
            mode,
            route,
        })
    }
}

/// Maps link that opens turn-by-turn directions
pub fn directions_url(
    origin: Coordinates,
    destination: Coordinates,
    place_id: &str,
    mode: TravelMode,
) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={}&destination={}&destination_place_id={}&travelmode={}",
        urlencoding::encode(&origin.to_string()),
        urlencoding::encode(&destination.to_string()),
        urlencoding::encode(place_id),
        mode.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BusinessStatus;
    use crate::services::storage::MemoryStorage;
    use crate::services::UnavailableProvider;

    const STATION: Coordinates = Coordinates { lat: 25.0478, lng: 121.5170 };

    /// Provider with a fixed station and place list
    struct FixedProvider {
        places: Vec<Candidate>,
        nearby_error: Option<fn() -> ProviderError>,
        location: Result<Coordinates, fn() -> ProviderError>,
    }

    impl FixedProvider {
        fn new(places: Vec<Candidate>) -> Self {
            Self {
                places,
                nearby_error: None,
                location: Ok(Coordinates::new(25.0400, 121.5100)),
            }
        }
    }

    impl PlacesProvider for FixedProvider {
        async fn geocode(&self, query: &str) -> Result<Coordinates, ProviderError> {
            if query.contains("不存在") {
                return Err(ProviderError::NotFound(query.to_string()));
            }
            Ok(STATION)
        }

        async fn search_nearby(
            &self,
            query: &NearbyQuery,
        ) -> Result<Vec<Candidate>, ProviderError> {
            match self.nearby_error {
                Some(error) => Err(error()),
                None => Ok(self
                    .places
                    .iter()
                    .filter(|p| !query.open_now || p.open_now == Some(true))
                    .cloned()
                    .collect()),
            }
        }

        async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, ProviderError> {
            let mut candidate = Candidate::new(place_id, "Saved place");
            candidate.coordinates = Some(Coordinates::new(25.05, 121.52));
            Ok(PlaceDetails {
                candidate,
                formatted_address: None,
                phone_number: None,
                website: None,
            })
        }

        async fn route(
            &self,
            _origin: Coordinates,
            _destination: Coordinates,
            _mode: TravelMode,
        ) -> Result<RouteSummary, ProviderError> {
            Ok(RouteSummary {
                distance_text: "1.2 公里".into(),
                duration_text: "15 分鐘".into(),
            })
        }

        async fn current_location(
            &self,
            _request: &LocationRequest,
        ) -> Result<Coordinates, ProviderError> {
            self.location.map_err(|error| error())
        }
    }

    fn place(id: &str, rating: f64, lat_offset: f64) -> Candidate {
        Candidate {
            id: id.into(),
            name: format!("Place {}", id),
            coordinates: Some(Coordinates::new(STATION.lat + lat_offset, STATION.lng)),
            rating: Some(rating),
            review_count: Some(100),
            price_tier: Some(2),
            business_status: Some(BusinessStatus::Operational),
            open_now: Some(true),
            ..Default::default()
        }
    }

    fn create_session() -> SearchSession {
        SearchSession::new(SessionOptions::default(), Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_live_search() {
        let provider = FixedProvider::new(vec![place("a", 3.0, 0.001), place("b", 5.0, 0.002)]);
        let mut session = create_session();

        let outcome = session.search(&provider, "台北車站").await.unwrap();
        assert_eq!(outcome.source, ResultSource::Live);
        assert_eq!(outcome.results[0].id(), "b");
        assert_eq!(session.history(), vec!["台北車站"]);
    }

    #[tokio::test]
    async fn test_unknown_station_aborts() {
        let provider = FixedProvider::new(vec![]);
        let mut session = create_session();

        let err = session.search(&provider, "不存在").await.unwrap_err();
        assert!(matches!(err, SearchError::StationNotFound(_)));
        assert!(session.outcome().is_none());
    }

    #[tokio::test]
    async fn test_unavailable_provider_falls_back() {
        let provider = UnavailableProvider::new("no key");
        let mut session = create_session();
        let fallback = session.options().fallback_center;

        let outcome = session.search(&provider, "中山").await.unwrap();
        assert!(outcome.is_synthetic());
        assert_eq!(outcome.notice.as_deref(), Some(SYNTHETIC_NOTICE));
        assert!(outcome.results.iter().all(|r| is_synthetic_id(r.id())));
        assert_eq!(outcome.reference, fallback);
    }

    #[tokio::test]
    async fn test_zero_results_is_live_and_empty() {
        let mut provider = FixedProvider::new(vec![]);
        provider.nearby_error = Some(|| ProviderError::ZeroResults);
        let mut session = create_session();

        let outcome = session.search(&provider, "中山").await.unwrap();
        assert_eq!(outcome.source, ResultSource::Live);
        assert!(outcome.results.is_empty());
    }

    #[tokio::test]
    async fn test_stale_outcome_discarded() {
        let provider = FixedProvider::new(vec![place("a", 4.0, 0.001)]);
        let mut session = create_session();

        let first = session.begin_search(session.request_for("A")).unwrap();
        let second = session.begin_search(session.request_for("B")).unwrap();

        let late = first.run(&provider).await.unwrap();
        let fresh = second.run(&provider).await.unwrap();

        assert!(session.apply(fresh));
        assert!(!session.apply(late));
        assert_eq!(session.station(), Some("B"));
    }

    #[tokio::test]
    async fn test_resort_without_search() {
        let provider =
            FixedProvider::new(vec![place("far", 5.0, 0.006), place("near", 3.5, 0.0005)]);
        let mut session = create_session();
        session.search(&provider, "台北車站").await.unwrap();

        session.resort(SortMode::Distance);
        assert_eq!(session.result_at(0).unwrap().id(), "near");
        assert_eq!(session.preferences().sort_mode, SortMode::Distance);

        session.resort(SortMode::Rating);
        assert_eq!(session.result_at(0).unwrap().id(), "far");
    }

    #[tokio::test]
    async fn test_open_now_off_restores_closed_places() {
        let mut closed = place("closed", 4.0, 0.001);
        closed.open_now = Some(false);
        let provider = FixedProvider::new(vec![closed, place("open", 4.0, 0.001)]);
        let mut session = create_session();
        session
            .update_preferences(PreferenceSet {
                open_now_only: true,
                ..PreferenceSet::default()
            })
            .unwrap();

        session.search(&provider, "台北車站").await.unwrap();
        assert_eq!(session.results().len(), 1);

        session.set_open_now(false);
        assert_eq!(session.results().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_preferences_not_saved() {
        let storage = Arc::new(MemoryStorage::new());
        let provider = FixedProvider::new(vec![place("a", 4.0, 0.001)]);
        let mut session = SearchSession::new(SessionOptions::default(), storage.clone());

        let result = session.update_preferences(PreferenceSet {
            radius: 10,
            ..PreferenceSet::default()
        });
        assert!(result.is_err());
        assert_eq!(session.preferences().radius, 800);
        assert!(session.search(&provider, "台北車站").await.is_ok());

        let mut reopened = SearchSession::new(SessionOptions::default(), storage);
        assert_eq!(reopened.preferences().radius, 800);
        assert!(reopened.search(&provider, "台北車站").await.is_ok());
    }

    #[tokio::test]
    async fn test_open_now_toggle() {
        let mut closed = place("closed", 4.0, 0.001);
        closed.open_now = Some(false);
        let provider = FixedProvider::new(vec![closed, place("open", 4.0, 0.001)]);
        let mut session = create_session();
        session.search(&provider, "台北車站").await.unwrap();
        assert_eq!(session.results().len(), 2);

        session.set_open_now(true);
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.result_at(0).unwrap().id(), "open");

        session.set_open_now(false);
        assert_eq!(session.results().len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_favorite() {
        let provider = FixedProvider::new(vec![place("a", 4.0, 0.001)]);
        let mut session = create_session();
        session.search(&provider, "台北車站").await.unwrap();

        assert_eq!(session.toggle_favorite("a"), Some(true));
        let entry = session.favorites().get("a").unwrap();
        assert_eq!(entry.station_context.as_deref(), Some("台北車站"));

        assert_eq!(session.toggle_favorite("a"), Some(false));
        assert_eq!(session.toggle_favorite("unknown"), None);
    }

    #[tokio::test]
    async fn test_navigate() {
        let provider = FixedProvider::new(vec![place("a", 4.0, 0.001)]);
        let mut session = create_session();
        session.search(&provider, "台北車站").await.unwrap();

        let plan = session
            .navigate(&provider, "a", TravelMode::Walking, &LocationRequest::default())
            .await
            .unwrap();
        assert_eq!(plan.route.unwrap().duration_text, "15 分鐘");
        assert!(plan.maps_url.contains("travelmode=walking"));

        // Not among the results: resolved through place details
        let plan = session
            .navigate(&provider, "saved", TravelMode::Transit, &LocationRequest::default())
            .await
            .unwrap();
        assert_eq!(plan.name, "Saved place");
    }

    #[tokio::test]
    async fn test_navigate_permission_denied() {
        let mut provider = FixedProvider::new(vec![place("a", 4.0, 0.001)]);
        provider.location = Err(|| ProviderError::PermissionDenied);
        let mut session = create_session();
        session.search(&provider, "台北車站").await.unwrap();

        let err = session
            .navigate(&provider, "a", TravelMode::Walking, &LocationRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NavigationError::PermissionDenied));
        // Results are untouched
        assert_eq!(session.results().len(), 1);
    }

    #[tokio::test]
    async fn test_navigate_synthetic_has_no_coordinates() {
        let mut session = create_session();
        session.search(&UnavailableProvider::new("offline"), "中山").await.unwrap();
        let id = session.result_at(0).unwrap().id().to_string();

        let err = session
            .navigate(
                &UnavailableProvider::new("offline"),
                &id,
                TravelMode::Walking,
                &LocationRequest::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, NavigationError::NoCoordinates(_)));
    }

    #[test]
    fn test_invalid_request() {
        let mut session = create_session();
        let err = session.begin_search(session.request_for("   ")).unwrap_err();
        assert!(matches!(err, SearchError::InvalidRequest(_)));
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_geocode_query() {
        let options = SessionOptions::default();
        assert_eq!(options.geocode_query("中山"), "台北中山捷運站");
    }
}
