//! Search, filter and headline stats for the HR dashboard.

use serde::{Deserialize, Serialize};

use crate::interview::models::Recommendation;
use crate::interview::scoring::rounded_mean;
use crate::results::StoredResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultFilter {
    #[default]
    All,
    Recommended,
    NotRecommended,
}

impl ResultFilter {
    fn admits(self, recommendation: Recommendation) -> bool {
        match self {
            ResultFilter::All => true,
            ResultFilter::Recommended => recommendation == Recommendation::Recommended,
            ResultFilter::NotRecommended => recommendation == Recommendation::NotRecommended,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub recommended: usize,
    pub not_recommended: usize,
    pub average_score: u32,
}

/// Name and registration number match case-insensitively; phone matches as typed.
/// A blank query matches everything.
pub fn matches_search(record: &StoredResult, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let identity = &record.result.identity;
    let needle = query.to_lowercase();
    identity.full_name.to_lowercase().contains(&needle)
        || identity.registration_no.to_lowercase().contains(&needle)
        || identity.phone.contains(query)
}

pub fn select(results: Vec<StoredResult>, query: &str, filter: ResultFilter) -> Vec<StoredResult> {
    results
        .into_iter()
        .filter(|r| filter.admits(r.result.recommendation) && matches_search(r, query))
        .collect()
}

/// Stats are always over the full result set, independent of search and filter.
pub fn compute_stats(results: &[StoredResult]) -> DashboardStats {
    let recommended = results
        .iter()
        .filter(|r| r.result.recommendation == Recommendation::Recommended)
        .count();

    DashboardStats {
        total: results.len(),
        recommended,
        not_recommended: results.len() - recommended,
        average_score: rounded_mean(results.iter().map(|r| r.result.score)),
    }
}
