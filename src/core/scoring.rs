use crate::core::distance::candidate_distance;
use crate::models::{Candidate, Coordinates, ScoringWeights};

/// Neutral price component for places with no known price tier
const UNKNOWN_PRICE_SCORE: f64 = 50.0;

/// Per-factor scores, each on a 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub rating: f64,
    pub distance: f64,
    pub reviews: f64,
    pub price: f64,
}

impl ScoreBreakdown {
    /// Weighted total, rounded half-up and clamped to 0-100
    pub fn total(&self, weights: &ScoringWeights) -> u8 {
        let total = self.rating * weights.rating
            + self.distance * weights.distance
            + self.reviews * weights.reviews
            + self.price * weights.price;

        if !total.is_finite() {
            return 0;
        }
        (total + 0.5).floor().clamp(0.0, 100.0) as u8
    }
}

/// Calculate the smart score (0-100) of a candidate seen from `reference`
///
/// Scoring formula:
/// score = round(
///     rating_score * 0.4 +      # rating x 20
///     distance_score * 0.3 +    # 100 - meters / 10, floored at 0
///     review_score * 0.2 +      # review count / 10, capped at 100
///     price_score * 0.1         # (5 - tier) x 25, 50 when unknown
/// )
///
/// Candidates without coordinates get a distance score of 0.
pub fn calculate_smart_score(
    candidate: &Candidate,
    reference: Coordinates,
    weights: &ScoringWeights,
) -> u8 {
    let distance_m = candidate_distance(candidate, reference);
    score_breakdown(candidate, distance_m).total(weights)
}

/// Component scores for a candidate at a known (or unknown) distance
pub fn score_breakdown(candidate: &Candidate, distance_m: Option<f64>) -> ScoreBreakdown {
    ScoreBreakdown {
        rating: rating_score(candidate.rating),
        distance: distance_score(distance_m),
        reviews: review_score(candidate.review_count),
        price: price_score(candidate.price_tier),
    }
}

#[inline]
fn rating_score(rating: Option<f64>) -> f64 {
    let rating = rating.filter(|r| r.is_finite()).unwrap_or(0.0);
    rating.clamp(0.0, 5.0) * 20.0
}

#[inline]
fn distance_score(distance_m: Option<f64>) -> f64 {
    match distance_m {
        Some(d) if d.is_finite() => (100.0 - d.max(0.0) / 10.0).max(0.0),
        _ => 0.0,
    }
}

#[inline]
fn review_score(review_count: Option<u32>) -> f64 {
    (f64::from(review_count.unwrap_or(0)) / 10.0).min(100.0)
}

#[inline]
fn price_score(price_tier: Option<u8>) -> f64 {
    match price_tier {
        Some(tier) => ((5.0 - f64::from(tier.min(4))) * 25.0).min(100.0),
        None => UNKNOWN_PRICE_SCORE,
    }
}
