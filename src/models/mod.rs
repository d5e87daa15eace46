// Model exports
pub mod domain;
pub mod labels;
pub mod requests;
pub mod responses;

pub use domain::{
    BusinessStatus, Candidate, Coordinates, FavoriteEntry, FilterCriteria, PreferenceSet,
    PriceFilterRange, ScoredCandidate, ScoringWeights, SortMode, TravelMode,
};
pub use requests::SearchRequest;
pub use responses::{ResultSource, SearchOutcome};
