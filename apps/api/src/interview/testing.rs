//! In-process stand-ins for the AI services, shared by the interview and router tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::candidates::CandidateIdentity;
use crate::interview::models::{Recommendation, Response, Verdict};
use crate::interview::services::{AnswerScorer, InterviewServices, QuestionSource, SummaryGenerator};
use crate::llm_client::LlmError;

pub const STUB_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_STUB_SCORE: u32 = 80;

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Ok,
    Fail,
    Hang,
    Delay(Duration),
}

impl Behavior {
    async fn act(self) -> Result<(), LlmError> {
        match self {
            Behavior::Ok => Ok(()),
            Behavior::Fail => Err(LlmError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            }),
            Behavior::Hang => std::future::pending().await,
            Behavior::Delay(d) => {
                tokio::time::sleep(d).await;
                Ok(())
            }
        }
    }
}

pub struct StubQuestions(pub Behavior);

#[async_trait]
impl QuestionSource for StubQuestions {
    async fn questions(&self, _domain: &str, _candidate_name: &str) -> Result<Vec<String>, LlmError> {
        self.0.act().await?;
        Ok((1..=5).map(|i| format!("Stub question {i}?")).collect())
    }
}

/// Returns scripted scores in order, then `DEFAULT_STUB_SCORE`.
pub struct StubScorer {
    behavior: Behavior,
    scripted: Mutex<VecDeque<u32>>,
    calls: AtomicUsize,
}

impl StubScorer {
    pub fn new(behavior: Behavior, scores: &[u32]) -> Self {
        Self {
            behavior,
            scripted: Mutex::new(scores.iter().copied().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerScorer for StubScorer {
    async fn score(&self, _question: &str, _answer: &str, _domain: &str) -> Result<u32, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.behavior.act().await?;
        let next = self.scripted.lock().unwrap().pop_front();
        Ok(next.unwrap_or(DEFAULT_STUB_SCORE))
    }
}

/// Always recommends when it succeeds, regardless of the average.
pub struct StubSummaries(pub Behavior);

#[async_trait]
impl SummaryGenerator for StubSummaries {
    async fn summarize(
        &self,
        candidate_name: &str,
        _domain: &str,
        _responses: &[Response],
        _average_score: u32,
    ) -> Result<Verdict, LlmError> {
        self.0.act().await?;
        Ok(Verdict {
            recommendation: Recommendation::Recommended,
            summary: format!("Stub summary for {candidate_name}."),
        })
    }
}

pub fn services(questions: Behavior, scorer: Behavior, summaries: Behavior) -> InterviewServices {
    scripted(questions, Arc::new(StubScorer::new(scorer, &[])), summaries)
}

pub fn scripted(
    questions: Behavior,
    scorer: Arc<StubScorer>,
    summaries: Behavior,
) -> InterviewServices {
    InterviewServices {
        questions: Arc::new(StubQuestions(questions)),
        scorer,
        summaries: Arc::new(StubSummaries(summaries)),
        call_timeout: STUB_TIMEOUT,
    }
}

pub fn identity() -> CandidateIdentity {
    CandidateIdentity {
        full_name: "Asha Rao".to_string(),
        phone: "9876543210".to_string(),
        registration_no: "REG001".to_string(),
        domain: None,
    }
}
