// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod ranker;
pub mod scoring;

pub use distance::{candidate_distance, meters_between};
pub use filters::{filter_candidates, matches_criteria};
pub use ranker::{sort_results, RankResult, ResultRanker};
pub use scoring::{calculate_smart_score, score_breakdown, ScoreBreakdown};
