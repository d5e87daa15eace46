use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{Coordinates, FilterCriteria, ScoringWeights};
use crate::services::provider::LocationRequest;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub filters: FilterSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub geolocation: GeolocationSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_geolocation_url")]
    pub geolocation_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Geocode query; `{station}` is replaced with the station name
    #[serde(default = "default_geocode_template")]
    pub geocode_template: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            geolocation_url: default_geolocation_url(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
            geocode_template: default_geocode_template(),
        }
    }
}

fn default_base_url() -> String { "https://maps.googleapis.com/maps/api".to_string() }
fn default_geolocation_url() -> String {
    "https://www.googleapis.com/geolocation/v1/geolocate".to_string()
}
fn default_language() -> String { "zh-TW".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_geocode_template() -> String { "台北{station}捷運站".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_radius")]
    pub default_radius: u32,
    /// Maximum number of ranked results shown
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    #[serde(default = "default_walking_speed")]
    pub walking_speed_m_per_min: f64,
    /// Reference point used when a station cannot be geocoded
    #[serde(default = "default_fallback_center")]
    pub fallback_center: Coordinates,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_radius: default_radius(),
            max_results: default_max_results(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
            walking_speed_m_per_min: default_walking_speed(),
            fallback_center: default_fallback_center(),
        }
    }
}

fn default_radius() -> u32 { 800 }
fn default_max_results() -> usize { 12 }
fn default_cache_ttl_secs() -> u64 { 1800 }
fn default_cache_capacity() -> u64 { 256 }
fn default_walking_speed() -> f64 { 75.0 }
fn default_fallback_center() -> Coordinates { Coordinates::new(25.0330, 121.5654) }

/// Base filter criteria; price and open-now come from each request
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSettings {
    #[serde(default = "default_true")]
    pub exclude_closed_permanently: bool,
    #[serde(default)]
    pub exclude_closed_temporarily: bool,
    #[serde(default)]
    pub min_rating: f64,
    #[serde(default)]
    pub min_reviews: u32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            exclude_closed_permanently: true,
            exclude_closed_temporarily: false,
            min_rating: 0.0,
            min_reviews: 0,
        }
    }
}

impl FilterSettings {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            exclude_closed_permanently: self.exclude_closed_permanently,
            exclude_closed_temporarily: self.exclude_closed_temporarily,
            min_rating: self.min_rating,
            min_reviews: self.min_reviews,
            ..FilterCriteria::default()
        }
    }
}

fn default_true() -> bool { true }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
    #[serde(default = "default_distance_weight")]
    pub distance: f64,
    #[serde(default = "default_reviews_weight")]
    pub reviews: f64,
    #[serde(default = "default_price_weight")]
    pub price: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            rating: default_rating_weight(),
            distance: default_distance_weight(),
            reviews: default_reviews_weight(),
            price: default_price_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        ScoringWeights {
            rating: config.rating,
            distance: config.distance,
            reviews: config.reviews,
            price: config.price,
        }
    }
}

fn default_rating_weight() -> f64 { 0.4 }
fn default_distance_weight() -> f64 { 0.3 }
fn default_reviews_weight() -> f64 { 0.2 }
fn default_price_weight() -> f64 { 0.1 }

#[derive(Debug, Clone, Deserialize)]
pub struct GeolocationSettings {
    #[serde(default = "default_geolocation_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_true")]
    pub high_accuracy: bool,
    #[serde(default)]
    pub allow_cached: bool,
}

impl Default for GeolocationSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_geolocation_timeout_ms(),
            high_accuracy: true,
            allow_cached: false,
        }
    }
}

impl GeolocationSettings {
    pub fn request(&self) -> LocationRequest {
        LocationRequest {
            timeout_ms: self.timeout_ms,
            high_accuracy: self.high_accuracy,
            allow_cached: self.allow_cached,
        }
    }
}

fn default_geolocation_timeout_ms() -> u64 { 10_000 }

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { path: default_storage_path() }
    }
}

fn default_storage_path() -> String { "mrt_food_storage.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderSettings::default(),
            search: SearchSettings::default(),
            filters: FilterSettings::default(),
            scoring: ScoringSettings::default(),
            geolocation: GeolocationSettings::default(),
            storage: StorageSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with MRT_FOOD_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local overrides, not checked in
            .add_source(File::with_name("config/local").required(false))
            // e.g., MRT_FOOD__SEARCH__MAX_RESULTS -> search.max_results
            .add_source(environment())
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("MRT_FOOD")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply well-known environment variables that do not follow the prefix scheme
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    // GOOGLE_MAPS_API_KEY is what the maps tooling exports
    let api_key = env::var("GOOGLE_MAPS_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = api_key {
        builder = builder.set_override("provider.api_key", api_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.rating, 0.4);
        assert_eq!(weights.distance, 0.3);
        assert_eq!(weights.reviews, 0.2);
        assert_eq!(weights.price, 0.1);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_filter_settings_criteria() {
        let criteria = FilterSettings::default().criteria();
        assert!(criteria.exclude_closed_permanently);
        assert!(!criteria.exclude_closed_temporarily);
        assert_eq!(criteria.price_range, None);
        assert!(!criteria.open_now_only);
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[search]\nmax_results = 5\n\n[scoring.weights]\nrating = 0.5\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.search.max_results, 5);
        assert_eq!(settings.search.default_radius, 800);
        assert_eq!(settings.scoring.weights.rating, 0.5);
        assert_eq!(settings.scoring.weights.distance, 0.3);
        assert_eq!(settings.provider.geocode_template, "台北{station}捷運站");
        assert_eq!(settings.search.fallback_center, Coordinates::new(25.0330, 121.5654));
    }
}
