use geo::{HaversineDistance, Point};

use crate::models::{Candidate, Coordinates};

impl From<Coordinates> for Point<f64> {
    fn from(value: Coordinates) -> Self {
        Point::new(value.lng, value.lat)
    }
}

/// Great-circle distance between two points in meters
///
/// Uses the haversine formula on a spherical earth, which matches what the
/// map provider reports to within a few meters at city scale.
#[inline]
pub fn meters_between(a: Coordinates, b: Coordinates) -> f64 {
    Point::from(a).haversine_distance(&Point::from(b))
}

/// Distance from `reference` to the candidate, `None` without coordinates
#[inline]
pub fn candidate_distance(candidate: &Candidate, reference: Coordinates) -> Option<f64> {
    candidate
        .coordinates
        .map(|point| meters_between(reference, point))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let taipei_main = Coordinates::new(25.0478, 121.5170);
        assert!(meters_between(taipei_main, taipei_main) < 0.01);
    }

    #[test]
    fn test_station_to_station() {
        // Taipei Main Station to Taipei 101 is roughly 5 km
        let taipei_main = Coordinates::new(25.0478, 121.5170);
        let taipei_101 = Coordinates::new(25.0330, 121.5654);

        let distance = meters_between(taipei_main, taipei_101);
        assert!((distance - 5150.0).abs() < 300.0, "Distance should be ~5.1km, got {}", distance);
    }

    #[test]
    fn test_candidate_without_coordinates() {
        let candidate = Candidate::new("mock_0", "Mock");
        assert!(candidate_distance(&candidate, Coordinates::new(25.0, 121.5)).is_none());
    }
}
