//! External AI services the interview depends on, and the fallback policy around them.
//!
//! Each call is attempted once, bounded by a timeout. Any failure, schema
//! violation or timeout resolves to the static fallback so a session can
//! always progress.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::interview::models::{Response, Verdict};
use crate::interview::scoring::{
    fallback_questions, fallback_verdict, recommendation_for, FALLBACK_SCORE, MAX_SCORE,
};
use crate::llm_client::LlmError;

#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn questions(&self, domain: &str, candidate_name: &str) -> Result<Vec<String>, LlmError>;
}

#[async_trait]
pub trait AnswerScorer: Send + Sync {
    /// Returns a score in 0..=100.
    async fn score(&self, question: &str, answer: &str, domain: &str) -> Result<u32, LlmError>;
}

#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn summarize(
        &self,
        candidate_name: &str,
        domain: &str,
        responses: &[Response],
        average_score: u32,
    ) -> Result<Verdict, LlmError>;
}

/// The three AI services plus the timeout applied to each call.
/// Cheap to clone; every session controller holds its own copy.
#[derive(Clone)]
pub struct InterviewServices {
    pub questions: Arc<dyn QuestionSource>,
    pub scorer: Arc<dyn AnswerScorer>,
    pub summaries: Arc<dyn SummaryGenerator>,
    pub call_timeout: Duration,
}

impl InterviewServices {
    /// Generated questions, or the domain fallback set.
    pub async fn load_questions(&self, domain: &str, candidate_name: &str) -> Vec<String> {
        let call = self.questions.questions(domain, candidate_name);
        match bounded(self.call_timeout, call).await {
            Ok(questions) => questions,
            Err(cause) => {
                warn!("Question generation failed for {domain}, using fallback set: {cause}");
                fallback_questions(domain)
            }
        }
    }

    /// The scorer's verdict on one answer, or the fixed fallback score.
    /// Scores above `MAX_SCORE` count as a failed call.
    pub async fn score_answer(&self, question: &str, answer: &str, domain: &str) -> u32 {
        let call = self.scorer.score(question, answer, domain);
        match bounded(self.call_timeout, call).await {
            Ok(score) if score <= MAX_SCORE => score,
            Ok(score) => {
                warn!(
                    "Scorer returned {score}, outside 0-{MAX_SCORE}; recording fallback score {FALLBACK_SCORE}"
                );
                FALLBACK_SCORE
            }
            Err(cause) => {
                warn!("Answer scoring failed, recording fallback score {FALLBACK_SCORE}: {cause}");
                FALLBACK_SCORE
            }
        }
    }

    /// The generator's verdict verbatim, or the threshold rule with a templated summary.
    pub async fn summarize(
        &self,
        candidate_name: &str,
        domain: &str,
        responses: &[Response],
        average_score: u32,
    ) -> Verdict {
        let call = self
            .summaries
            .summarize(candidate_name, domain, responses, average_score);
        match bounded(self.call_timeout, call).await {
            Ok(verdict) => {
                if verdict.recommendation != recommendation_for(average_score) {
                    debug!(
                        "Summary recommendation '{}' differs from threshold rule at {average_score}%",
                        verdict.recommendation
                    );
                }
                verdict
            }
            Err(cause) => {
                warn!("Summary generation failed, using threshold verdict: {cause}");
                fallback_verdict(candidate_name, domain, average_score)
            }
        }
    }
}

/// Runs `call` under `limit`, flattening expiry into a printable failure cause.
async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, String>
where
    F: Future<Output = Result<T, LlmError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("timed out after {}s", limit.as_secs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::Recommendation;
    use crate::interview::testing::{scripted, services, Behavior, StubScorer};

    fn sample_responses() -> Vec<Response> {
        vec![Response {
            question: "Q1".to_string(),
            answer: "A1".to_string(),
            score: 50,
        }]
    }

    #[tokio::test]
    async fn test_question_failure_uses_domain_fallback() {
        let svc = services(Behavior::Fail, Behavior::Ok, Behavior::Ok);
        let questions = svc.load_questions("Backend Developer", "Asha").await;
        assert_eq!(questions.len(), 5);
        assert!(questions.iter().all(|q| q.contains("Backend Developer")));
    }

    #[tokio::test]
    async fn test_scorer_failure_yields_fallback_score() {
        let svc = services(Behavior::Ok, Behavior::Fail, Behavior::Ok);
        assert_eq!(svc.score_answer("Q", "A", "Finance").await, 70);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_scorer_times_out_to_fallback() {
        let svc = services(Behavior::Ok, Behavior::Hang, Behavior::Ok);
        assert_eq!(svc.score_answer("Q", "A", "Finance").await, FALLBACK_SCORE);
    }

    #[tokio::test]
    async fn test_out_of_range_score_yields_fallback() {
        let scorer = Arc::new(StubScorer::new(Behavior::Ok, &[100, 101, 250]));
        let svc = scripted(Behavior::Ok, scorer, Behavior::Ok);
        assert_eq!(svc.score_answer("Q", "A", "Finance").await, 100);
        assert_eq!(svc.score_answer("Q", "A", "Finance").await, FALLBACK_SCORE);
        assert_eq!(svc.score_answer("Q", "A", "Finance").await, FALLBACK_SCORE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_question_source_times_out_to_fallback() {
        let svc = services(Behavior::Hang, Behavior::Ok, Behavior::Ok);
        let questions = svc.load_questions("Cybersecurity", "Asha").await;
        assert_eq!(questions, fallback_questions("Cybersecurity"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_summary_generator_times_out_to_fallback() {
        let svc = services(Behavior::Ok, Behavior::Ok, Behavior::Hang);
        let verdict = svc
            .summarize("Ravi Kumar", "Finance", &sample_responses(), 66)
            .await;
        assert_eq!(verdict, fallback_verdict("Ravi Kumar", "Finance", 66));
        assert_eq!(verdict.recommendation, Recommendation::Recommended);
    }

    #[tokio::test]
    async fn test_summary_failure_uses_threshold_verdict() {
        let svc = services(Behavior::Ok, Behavior::Ok, Behavior::Fail);
        let verdict = svc
            .summarize("Ravi Kumar", "Finance", &sample_responses(), 50)
            .await;
        assert_eq!(verdict.recommendation, Recommendation::NotRecommended);
        assert!(verdict.summary.contains("Ravi Kumar"));
        assert!(verdict.summary.contains("Finance"));
        assert!(verdict.summary.contains("50%"));
    }

    #[tokio::test]
    async fn test_summary_success_is_authoritative() {
        // The stub generator always recommends, even at 50%.
        let svc = services(Behavior::Ok, Behavior::Ok, Behavior::Ok);
        let verdict = svc
            .summarize("Ravi Kumar", "Finance", &sample_responses(), 50)
            .await;
        assert_eq!(verdict.recommendation, Recommendation::Recommended);
    }
}
