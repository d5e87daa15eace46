use serde::{Deserialize, Serialize};
use validator::Validate;

use super::domain::{FilterCriteria, PreferenceSet, PriceFilterRange, SortMode};

/// A station search, snapshotted from the user's preferences when issued
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[validate(length(min = 1, max = 64))]
    pub station: String,
    #[validate(range(min = 50, max = 50000))]
    #[serde(default = "default_radius")]
    pub radius: u32,
    #[serde(default = "default_price_level")]
    pub price_level: i64,
    #[serde(default)]
    pub sort_mode: SortMode,
    #[serde(default)]
    pub open_now_only: bool,
    #[validate(length(max = 32))]
    #[serde(default)]
    pub food_type: String,
}

fn default_radius() -> u32 {
    800
}

fn default_price_level() -> i64 {
    3
}

impl SearchRequest {
    pub fn new(station: impl Into<String>, preferences: &PreferenceSet) -> Self {
        Self {
            station: station.into().trim().to_string(),
            radius: preferences.radius,
            price_level: preferences.price_level,
            sort_mode: preferences.sort_mode,
            open_now_only: preferences.open_now_only,
            food_type: preferences.food_type.clone(),
        }
    }

    pub fn price_range(&self) -> PriceFilterRange {
        PriceFilterRange::from_level(self.price_level)
    }

    pub fn category(&self) -> Option<&str> {
        let food_type = self.food_type.trim();
        (!food_type.is_empty()).then_some(food_type)
    }

    /// Apply this request's user-controlled filters on top of the configured base criteria
    pub fn criteria(&self, base: &FilterCriteria) -> FilterCriteria {
        FilterCriteria {
            price_range: Some(self.price_range()),
            open_now_only: self.open_now_only,
            ..*base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_preferences() {
        let prefs = PreferenceSet {
            radius: 500,
            price_level: 3,
            sort_mode: SortMode::Rating,
            open_now_only: true,
            food_type: "cafe".into(),
        };
        let request = SearchRequest::new("  中山 ", &prefs);

        assert_eq!(request.station, "中山");
        assert_eq!(request.category(), Some("cafe"));
        assert!(request.validate().is_ok());

        let criteria = request.criteria(&FilterCriteria::default());
        assert_eq!(criteria.price_range, Some(PriceFilterRange { min_tier: 2, max_tier: 3 }));
        assert!(criteria.open_now_only);
        assert!(criteria.exclude_closed_permanently);
    }

    #[test]
    fn test_request_validation() {
        let request = SearchRequest::new("", &PreferenceSet::default());
        assert!(request.validate().is_err());

        let mut request = SearchRequest::new("台北車站", &PreferenceSet::default());
        request.radius = 10;
        assert!(request.validate().is_err());
    }
}
