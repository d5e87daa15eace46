use crate::models::{BusinessStatus, Candidate, FilterCriteria};

/// Stage 1: business status exclusion
///
/// Only an exact match on an excluded status removes a candidate; places with
/// no reported status are kept.
#[inline]
pub fn passes_business_status(candidate: &Candidate, criteria: &FilterCriteria) -> bool {
    match candidate.business_status {
        Some(BusinessStatus::ClosedPermanently) => !criteria.exclude_closed_permanently,
        Some(BusinessStatus::ClosedTemporarily) => !criteria.exclude_closed_temporarily,
        Some(BusinessStatus::Operational) | None => true,
    }
}

/// Stage 2: price range check, unknown tiers always pass
#[inline]
pub fn passes_price_range(candidate: &Candidate, criteria: &FilterCriteria) -> bool {
    match (criteria.price_range, candidate.price_tier) {
        (Some(range), Some(tier)) => range.contains(tier),
        _ => true,
    }
}

/// Stage 3: minimum rating, missing ratings count as 0
#[inline]
pub fn passes_min_rating(candidate: &Candidate, criteria: &FilterCriteria) -> bool {
    if criteria.min_rating <= 0.0 {
        return true;
    }
    candidate.rating.unwrap_or(0.0) >= criteria.min_rating
}

/// Stage 4: minimum review count, missing counts count as 0
#[inline]
pub fn passes_min_reviews(candidate: &Candidate, criteria: &FilterCriteria) -> bool {
    if criteria.min_reviews == 0 {
        return true;
    }
    candidate.review_count.unwrap_or(0) >= criteria.min_reviews
}

/// Stage 5: open-now, only places known to be open pass
#[inline]
pub fn passes_open_now(candidate: &Candidate, criteria: &FilterCriteria) -> bool {
    !criteria.open_now_only || candidate.open_now == Some(true)
}

/// Check a candidate against every stage of the pipeline
#[inline]
pub fn matches_criteria(candidate: &Candidate, criteria: &FilterCriteria) -> bool {
    passes_business_status(candidate, criteria)
        && passes_price_range(candidate, criteria)
        && passes_min_rating(candidate, criteria)
        && passes_min_reviews(candidate, criteria)
        && passes_open_now(candidate, criteria)
}

/// Run the filter pipeline, keeping survivors in input order
pub fn filter_candidates<'a>(
    candidates: &'a [Candidate],
    criteria: &FilterCriteria,
) -> Vec<&'a Candidate> {
    let survivors: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| matches_criteria(c, criteria))
        .collect();

    tracing::debug!(
        "Filter pipeline kept {} of {} candidates",
        survivors.len(),
        candidates.len()
    );
    survivors
}
