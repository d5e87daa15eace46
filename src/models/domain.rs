use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Operating state reported by the places provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessStatus {
    Operational,
    ClosedTemporarily,
    ClosedPermanently,
}

impl BusinessStatus {
    /// Parse the provider's status string, ignoring unknown values
    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "OPERATIONAL" => Some(Self::Operational),
            "CLOSED_TEMPORARILY" => Some(Self::ClosedTemporarily),
            "CLOSED_PERMANENTLY" => Some(Self::ClosedPermanently),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Operational => "營業中",
            Self::ClosedTemporarily => "暫停營業",
            Self::ClosedPermanently => "永久歇業",
        }
    }
}

/// A place returned by the places provider.
///
/// Every provider field except `id` and `name` may be missing; mock data in
/// particular carries no coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub price_tier: Option<u8>,
    #[serde(default)]
    pub business_status: Option<BusinessStatus>,
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A candidate annotated with its smart score.
///
/// The score is bound to `reference`; re-ranking against another point must
/// start again from the raw [`Candidate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub score: u8,
    pub distance_m: Option<f64>,
    pub reference: Coordinates,
}

impl ScoredCandidate {
    pub fn id(&self) -> &str {
        &self.candidate.id
    }

    /// Walking time rounded up to whole minutes
    pub fn walking_minutes(&self, meters_per_minute: f64) -> Option<u32> {
        if meters_per_minute <= 0.0 {
            return None;
        }
        self.distance_m
            .map(|d| (d / meters_per_minute).ceil().max(0.0) as u32)
    }

    /// Build the favorite record from what the user was shown
    pub fn to_favorite(&self, station: Option<&str>) -> FavoriteEntry {
        let c = &self.candidate;
        FavoriteEntry {
            place_id: c.id.clone(),
            name: c.name.clone(),
            station_context: station.map(str::to_string),
            rating: c.rating,
            review_count: c.review_count,
            price_tier: c.price_tier,
            address: c.address.clone(),
            photo_url: c.photo_url.clone(),
            saved_at: Some(chrono::Utc::now()),
        }
    }
}

/// Scoring weights for the smart score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub rating: f64,
    pub distance: f64,
    pub reviews: f64,
    pub price: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rating: 0.4,
            distance: 0.3,
            reviews: 0.2,
            price: 0.1,
        }
    }
}

/// Inclusive price tier window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFilterRange {
    pub min_tier: u8,
    pub max_tier: u8,
}

impl PriceFilterRange {
    pub const MAX_TIER: u8 = 4;

    /// Range used when the selector level is outside the preset table
    pub const UNRESTRICTED: PriceFilterRange = PriceFilterRange {
        min_tier: 1,
        max_tier: 4,
    };

    pub fn new(min_tier: u8, max_tier: u8) -> Option<Self> {
        if min_tier > max_tier || max_tier > Self::MAX_TIER {
            return None;
        }
        Some(Self { min_tier, max_tier })
    }

    /// Map the 1-4 price selector onto the contiguous-tier preset table
    pub fn from_level(level: i64) -> Self {
        match level {
            1 => Self { min_tier: 1, max_tier: 1 },
            2 => Self { min_tier: 2, max_tier: 2 },
            3 => Self { min_tier: 2, max_tier: 3 },
            4 => Self { min_tier: 3, max_tier: 4 },
            _ => Self::UNRESTRICTED,
        }
    }

    #[inline]
    pub fn contains(&self, tier: u8) -> bool {
        tier >= self.min_tier && tier <= self.max_tier
    }
}

/// Criteria for the filter pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCriteria {
    pub exclude_closed_permanently: bool,
    pub exclude_closed_temporarily: bool,
    pub min_rating: f64,
    pub min_reviews: u32,
    pub price_range: Option<PriceFilterRange>,
    pub open_now_only: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            exclude_closed_permanently: true,
            exclude_closed_temporarily: false,
            min_rating: 0.0,
            min_reviews: 0,
            price_range: None,
            open_now_only: false,
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Smart,
    Rating,
    Distance,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smart => "smart",
            Self::Rating => "rating",
            Self::Distance => "distance",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smart" => Ok(Self::Smart),
            "rating" => Ok(Self::Rating),
            "distance" => Ok(Self::Distance),
            other => Err(format!("unknown sort mode '{}'", other)),
        }
    }
}

/// Travel mode for directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walking,
    Transit,
    Driving,
    Bicycling,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Transit => "transit",
            Self::Driving => "driving",
            Self::Bicycling => "bicycling",
        }
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walking" => Ok(Self::Walking),
            "transit" => Ok(Self::Transit),
            "driving" => Ok(Self::Driving),
            "bicycling" => Ok(Self::Bicycling),
            other => Err(format!("unknown travel mode '{}'", other)),
        }
    }
}

/// A bookmarked place.
///
/// Field names on disk match the layout the browser build already wrote to
/// local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    #[serde(rename = "placeId")]
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "station", default)]
    pub station_context: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "userRatingsTotal", default)]
    pub review_count: Option<u32>,
    #[serde(rename = "priceLevel", default)]
    pub price_tier: Option<u8>,
    #[serde(rename = "vicinity", default)]
    pub address: Option<String>,
    #[serde(rename = "photoUrl", default)]
    pub photo_url: Option<String>,
    #[serde(rename = "savedAt", default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl FavoriteEntry {
    pub fn new(place_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            place_id: place_id.into(),
            name: name.into(),
            station_context: None,
            rating: None,
            review_count: None,
            price_tier: None,
            address: None,
            photo_url: None,
            saved_at: None,
        }
    }
}

/// Search radius bounds in meters
pub const MIN_RADIUS_M: u32 = 50;
pub const MAX_RADIUS_M: u32 = 50_000;

/// Price selector levels; 0 stands for any price
pub const MAX_PRICE_LEVEL: i64 = 4;

pub const MAX_FOOD_TYPE_LEN: usize = 32;

/// User search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSet {
    #[validate(range(min = 50, max = 50000))]
    pub radius: u32,
    #[validate(range(min = 0, max = 4))]
    pub price_level: i64,
    pub sort_mode: SortMode,
    pub open_now_only: bool,
    #[validate(length(max = 32))]
    pub food_type: String,
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self {
            radius: 800,
            price_level: 3,
            sort_mode: SortMode::Smart,
            open_now_only: false,
            food_type: String::new(),
        }
    }
}

impl PreferenceSet {
    pub fn price_range(&self) -> PriceFilterRange {
        PriceFilterRange::from_level(self.price_level)
    }

    /// Provider category filter, `None` when unrestricted
    pub fn category(&self) -> Option<&str> {
        let food_type = self.food_type.trim();
        (!food_type.is_empty()).then_some(food_type)
    }
}
