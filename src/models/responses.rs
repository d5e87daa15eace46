use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{Candidate, Coordinates, ScoredCandidate};
use super::requests::SearchRequest;

/// Where a result list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// Answered by the places provider (possibly with zero results)
    Live,
    /// Generated locally because the provider failed
    Synthetic,
}

/// Outcome of one search run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub request_id: Uuid,
    pub generation: u64,
    pub station: String,
    /// The request as issued, used when re-ranking
    pub request: SearchRequest,
    pub reference: Coordinates,
    /// Unfiltered provider candidates, kept for re-ranking
    pub candidates: Vec<Candidate>,
    pub results: Vec<ScoredCandidate>,
    pub source: ResultSource,
    pub notice: Option<String>,
}

impl SearchOutcome {
    pub fn is_synthetic(&self) -> bool {
        self.source == ResultSource::Synthetic
    }

    pub fn total_candidates(&self) -> usize {
        self.candidates.len()
    }
}
