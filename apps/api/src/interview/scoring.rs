//! Score aggregation and the static fallbacks used when an AI service fails.

use crate::interview::models::{Recommendation, Response, Verdict};

/// Number of questions in a session.
pub const QUESTION_COUNT: usize = 5;
/// Score recorded for an answer when the scorer is unavailable.
pub const FALLBACK_SCORE: u32 = 70;
/// Minimum average score for a "recommended" verdict.
pub const RECOMMENDATION_THRESHOLD: u32 = 65;
pub const MAX_SCORE: u32 = 100;

/// Mean of `scores` rounded half-up to an integer; 0 for an empty input.
///
/// Computed on the exact rational mean as `(2·sum + n) / (2·n)`, so 72.5
/// becomes 73 and 72.4 becomes 72 with no floating-point error.
pub fn rounded_mean<I>(scores: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let (sum, n) = scores
        .into_iter()
        .fold((0_u64, 0_u64), |(sum, n), s| (sum + u64::from(s), n + 1));
    if n == 0 {
        return 0;
    }
    ((2 * sum + n) / (2 * n)) as u32
}

pub fn average_score(responses: &[Response]) -> u32 {
    rounded_mean(responses.iter().map(|r| r.score))
}

pub fn recommendation_for(score: u32) -> Recommendation {
    if score >= RECOMMENDATION_THRESHOLD {
        Recommendation::Recommended
    } else {
        Recommendation::NotRecommended
    }
}

/// Fixed question set used when generation fails. Every question names the domain.
pub fn fallback_questions(domain: &str) -> Vec<String> {
    vec![
        format!("Tell us about your experience in {domain}."),
        format!("What are the key skills needed for success in {domain}?"),
        format!("Describe a challenging {domain} project you've worked on."),
        format!("How do you stay updated with industry trends in {domain}?"),
        format!("Where do you see yourself in {domain} in 5 years?"),
    ]
}

/// Threshold verdict with a templated summary, used when the summary generator fails.
pub fn fallback_verdict(candidate_name: &str, domain: &str, average_score: u32) -> Verdict {
    let recommendation = recommendation_for(average_score);
    let outlook = match recommendation {
        Recommendation::Recommended => {
            "The candidate demonstrated satisfactory performance and is recommended for further consideration."
        }
        Recommendation::NotRecommended => {
            "The candidate may require additional training or experience before proceeding."
        }
    };

    Verdict {
        recommendation,
        summary: format!(
            "{candidate_name} achieved an average score of {average_score}% in the {domain} assessment. {outlook}"
        ),
    }
}
