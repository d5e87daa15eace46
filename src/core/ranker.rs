use std::cmp::Ordering;

use crate::core::{
    distance::candidate_distance,
    filters::filter_candidates,
    scoring::score_breakdown,
};
use crate::models::{
    Candidate, Coordinates, FilterCriteria, ScoredCandidate, ScoringWeights, SortMode,
};

/// Result of the ranking process
#[derive(Debug, Clone)]
pub struct RankResult {
    pub results: Vec<ScoredCandidate>,
    pub total_candidates: usize,
    pub survivors: usize,
}

/// Ranking orchestrator - implements the filter / score / sort / truncate pipeline
///
/// # Pipeline Stages
/// 1. Filter pipeline (status, price, rating, reviews, open-now)
/// 2. Smart score annotation against the reference point
/// 3. Stable sort by the requested mode
/// 4. Truncation to the result cap
#[derive(Debug, Clone)]
pub struct ResultRanker {
    weights: ScoringWeights,
}

impl ResultRanker {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank candidates around a reference point
    ///
    /// # Arguments
    /// * `candidates` - Provider results, left untouched
    /// * `reference` - Station location used for distance and scoring
    /// * `criteria` - Filter pipeline settings
    /// * `sort_mode` - Final ordering
    /// * `cap` - Maximum number of results to return
    pub fn rank(
        &self,
        candidates: &[Candidate],
        reference: Coordinates,
        criteria: &FilterCriteria,
        sort_mode: SortMode,
        cap: usize,
    ) -> RankResult {
        let total_candidates = candidates.len();

        let mut scored: Vec<ScoredCandidate> = filter_candidates(candidates, criteria)
            .into_iter()
            .map(|candidate| self.annotate(candidate, reference))
            .collect();
        let survivors = scored.len();

        sort_results(&mut scored, sort_mode);
        scored.truncate(cap);

        tracing::debug!(
            "Ranked {} candidates: {} survived filters, returning {} by {}",
            total_candidates,
            survivors,
            scored.len(),
            sort_mode
        );

        RankResult {
            results: scored,
            total_candidates,
            survivors,
        }
    }

    /// Attach the smart score and distance for one candidate
    pub fn annotate(&self, candidate: &Candidate, reference: Coordinates) -> ScoredCandidate {
        let distance_m = candidate_distance(candidate, reference);
        let score = score_breakdown(candidate, distance_m).total(&self.weights);

        ScoredCandidate {
            candidate: candidate.clone(),
            score,
            distance_m,
            reference,
        }
    }
}

impl Default for ResultRanker {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Stable sort in place; equal keys keep their provider order
pub fn sort_results(results: &mut [ScoredCandidate], sort_mode: SortMode) {
    match sort_mode {
        SortMode::Smart => results.sort_by(|a, b| b.score.cmp(&a.score)),
        SortMode::Rating => results.sort_by(|a, b| {
            let a_rating = a.candidate.rating.unwrap_or(0.0);
            let b_rating = b.candidate.rating.unwrap_or(0.0);
            b_rating.total_cmp(&a_rating)
        }),
        SortMode::Distance => results.sort_by(|a, b| compare_distance(a.distance_m, b.distance_m)),
    }
}

/// Ascending distance, unknown distances last
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BusinessStatus, PriceFilterRange};

    const STATION: Coordinates = Coordinates { lat: 25.0330, lng: 121.5654 };

    fn create_candidate(id: &str, rating: f64, reviews: u32, offset_lat: Option<f64>) -> Candidate {
        Candidate {
            rating: Some(rating),
            review_count: Some(reviews),
            price_tier: Some(2),
            coordinates: offset_lat.map(|d| Coordinates::new(STATION.lat + d, STATION.lng)),
            ..Candidate::new(id, format!("Place {}", id))
        }
    }

    #[test]
    fn test_rank_filters_and_scores() {
        let ranker = ResultRanker::with_default_weights();
        let mut closed = create_candidate("closed", 5.0, 900, Some(0.0005));
        closed.business_status = Some(BusinessStatus::ClosedPermanently);

        let candidates = vec![
            create_candidate("1", 4.5, 300, Some(0.0005)),
            closed,
            create_candidate("2", 3.0, 20, Some(0.005)),
        ];

        let result = ranker.rank(
            &candidates,
            STATION,
            &FilterCriteria::default(),
            SortMode::Smart,
            10,
        );

        assert_eq!(result.total_candidates, 3);
        assert_eq!(result.survivors, 2);
        assert_eq!(result.results[0].id(), "1");
        assert_eq!(result.results[1].id(), "2");
        assert!(result.results[0].score > result.results[1].score);
        assert!(result.results.iter().all(|r| r.reference == STATION));
    }

    #[test]
    fn test_rating_sort_treats_missing_as_zero() {
        let ranker = ResultRanker::default();
        let mut unrated = create_candidate("unrated", 0.0, 10, None);
        unrated.rating = None;

        let candidates = vec![
            unrated,
            create_candidate("mid", 3.8, 10, None),
            create_candidate("top", 4.9, 10, None),
        ];

        let result = ranker.rank(
            &candidates,
            STATION,
            &FilterCriteria::default(),
            SortMode::Rating,
            10,
        );
        let ids: Vec<&str> = result.results.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["top", "mid", "unrated"]);
    }

    #[test]
    fn test_distance_sort_puts_unknown_last() {
        let ranker = ResultRanker::default();
        let candidates = vec![
            create_candidate("nowhere", 4.0, 10, None),
            create_candidate("far", 4.0, 10, Some(0.004)),
            create_candidate("near", 4.0, 10, Some(0.001)),
            create_candidate("nowhere2", 4.0, 10, None),
        ];

        let result = ranker.rank(
            &candidates,
            STATION,
            &FilterCriteria::default(),
            SortMode::Distance,
            10,
        );
        let ids: Vec<&str> = result.results.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["near", "far", "nowhere", "nowhere2"]);
    }

    #[test]
    fn test_smart_sort_is_stable() {
        let ranker = ResultRanker::default();
        let candidates: Vec<Candidate> = (0..6)
            .map(|i| create_candidate(&i.to_string(), 4.0, 100, None))
            .collect();

        let result = ranker.rank(
            &candidates,
            STATION,
            &FilterCriteria::default(),
            SortMode::Smart,
            10,
        );
        let ids: Vec<&str> = result.results.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_respects_cap() {
        let ranker = ResultRanker::default();
        let candidates: Vec<Candidate> = (0..20)
            .map(|i| {
                create_candidate(
                    &i.to_string(),
                    3.0 + (i % 5) as f64 * 0.4,
                    100,
                    Some(i as f64 * 0.0002),
                )
            })
            .collect();

        let result = ranker.rank(
            &candidates,
            STATION,
            &FilterCriteria::default(),
            SortMode::Smart,
            12,
        );
        assert_eq!(result.results.len(), 12);

        let result = ranker.rank(
            &candidates,
            STATION,
            &FilterCriteria::default(),
            SortMode::Smart,
            0,
        );
        assert!(result.results.is_empty());
    }

    #[test]
    fn test_price_range_applied() {
        let ranker = ResultRanker::default();
        let mut pricey = create_candidate("pricey", 4.8, 500, Some(0.001));
        pricey.price_tier = Some(4);

        let criteria = FilterCriteria {
            price_range: Some(PriceFilterRange::from_level(3)),
            ..FilterCriteria::default()
        };
        let candidates = vec![pricey, create_candidate("ok", 4.0, 100, Some(0.001))];

        let result = ranker.rank(&candidates, STATION, &criteria, SortMode::Smart, 10);
        assert_eq!(result.results.len(), 1);
        assert_eq!(result.results[0].id(), "ok");
    }

    #[test]
    fn test_input_not_mutated() {
        let ranker = ResultRanker::default();
        let candidates = vec![
            create_candidate("a", 2.0, 1, None),
            create_candidate("b", 5.0, 1, None),
        ];
        let before = candidates.clone();

        let _ = ranker.rank(&candidates, STATION, &FilterCriteria::default(), SortMode::Rating, 10);
        assert_eq!(candidates, before);
    }
}
