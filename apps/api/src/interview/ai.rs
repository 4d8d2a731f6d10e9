//! LLM-backed implementations of the interview services.
//!
//! Replies are validated against a strict schema here; anything that does not
//! fit becomes an `LlmError::Schema` and the caller falls back.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::interview::models::{Response, Verdict};
use crate::interview::prompts::{
    QUESTIONS_PROMPT, QUESTIONS_SYSTEM, SCORE_PROMPT, SCORE_SYSTEM, SUMMARY_PROMPT, SUMMARY_SYSTEM,
};
use crate::interview::scoring::{MAX_SCORE, QUESTION_COUNT};
use crate::interview::services::{
    AnswerScorer, InterviewServices, QuestionSource, SummaryGenerator,
};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{JsonShape, LlmClient, LlmError};

/// Wires all three services to one shared client.
pub fn llm_services(llm: LlmClient, call_timeout: Duration) -> InterviewServices {
    InterviewServices {
        questions: Arc::new(LlmQuestionSource(llm.clone())),
        scorer: Arc::new(LlmAnswerScorer(llm.clone())),
        summaries: Arc::new(LlmSummaryGenerator(llm)),
        call_timeout,
    }
}

#[derive(Debug, Deserialize)]
struct ScorePayload {
    score: u32,
    #[serde(default)]
    feedback: Option<String>,
}

pub struct LlmQuestionSource(pub LlmClient);

#[async_trait]
impl QuestionSource for LlmQuestionSource {
    async fn questions(&self, domain: &str, candidate_name: &str) -> Result<Vec<String>, LlmError> {
        let system = format!(
            "{}\n\n{JSON_ONLY_INSTRUCTION}",
            QUESTIONS_SYSTEM.replace("{domain}", domain)
        );
        let prompt = QUESTIONS_PROMPT
            .replace("{candidate_name}", candidate_name)
            .replace("{domain}", domain);

        let questions: Vec<String> = self.0.call_json(&system, &prompt, JsonShape::Array).await?;
        validate_questions(questions)
    }
}

pub struct LlmAnswerScorer(pub LlmClient);

#[async_trait]
impl AnswerScorer for LlmAnswerScorer {
    async fn score(&self, question: &str, answer: &str, domain: &str) -> Result<u32, LlmError> {
        let system = format!(
            "{}\n\n{JSON_ONLY_INSTRUCTION}",
            SCORE_SYSTEM.replace("{domain}", domain)
        );
        let prompt = SCORE_PROMPT
            .replace("{question}", question)
            .replace("{answer}", answer);

        let payload: ScorePayload = self.0.call_json(&system, &prompt, JsonShape::Object).await?;
        if let Some(feedback) = &payload.feedback {
            tracing::debug!("Scorer feedback: {feedback}");
        }
        validate_score(payload.score)
    }
}

pub struct LlmSummaryGenerator(pub LlmClient);

#[async_trait]
impl SummaryGenerator for LlmSummaryGenerator {
    async fn summarize(
        &self,
        candidate_name: &str,
        domain: &str,
        responses: &[Response],
        average_score: u32,
    ) -> Result<Verdict, LlmError> {
        let system = format!(
            "{}\n\n{JSON_ONLY_INSTRUCTION}",
            SUMMARY_SYSTEM
                .replace("{candidate_name}", candidate_name)
                .replace("{domain}", domain)
                .replace("{average_score}", &average_score.to_string())
                .replace("{responses}", &format_responses(responses))
        );

        let verdict: Verdict = self
            .0
            .call_json(&system, SUMMARY_PROMPT, JsonShape::Object)
            .await?;
        validate_verdict(verdict)
    }
}

/// Exactly `QUESTION_COUNT` non-blank questions, trimmed.
fn validate_questions(questions: Vec<String>) -> Result<Vec<String>, LlmError> {
    if questions.len() != QUESTION_COUNT {
        return Err(LlmError::Schema(format!(
            "expected {QUESTION_COUNT} questions, got {}",
            questions.len()
        )));
    }
    questions
        .into_iter()
        .map(|q| {
            let q = q.trim();
            if q.is_empty() {
                Err(LlmError::Schema("blank question".to_string()))
            } else {
                Ok(q.to_string())
            }
        })
        .collect()
}

fn validate_score(score: u32) -> Result<u32, LlmError> {
    if score > MAX_SCORE {
        return Err(LlmError::Schema(format!("score {score} outside 0-{MAX_SCORE}")));
    }
    Ok(score)
}

fn validate_verdict(verdict: Verdict) -> Result<Verdict, LlmError> {
    let summary = verdict.summary.trim();
    if summary.is_empty() {
        return Err(LlmError::Schema("blank summary".to_string()));
    }
    Ok(Verdict {
        recommendation: verdict.recommendation,
        summary: summary.to_string(),
    })
}

fn format_responses(responses: &[Response]) -> String {
    responses
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "Q{}: {}\nAnswer: {}\nScore: {}/100",
                i + 1,
                r.question,
                r.answer,
                r.score
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::Recommendation;
    use crate::llm_client::parse_json_reply;

    #[test]
    fn test_questions_need_exactly_five() {
        let four = vec!["a?".to_string(); 4];
        assert!(matches!(validate_questions(four), Err(LlmError::Schema(_))));

        let five = vec![" a? ".to_string(); 5];
        let valid = validate_questions(five).unwrap();
        assert!(valid.iter().all(|q| q == "a?"));
    }

    #[test]
    fn test_blank_question_rejected() {
        let mut questions = vec!["a?".to_string(); 5];
        questions[3] = "  ".to_string();
        assert!(validate_questions(questions).is_err());
    }

    #[test]
    fn test_score_above_hundred_rejected() {
        assert!(validate_score(100).is_ok());
        assert!(matches!(validate_score(101), Err(LlmError::Schema(_))));
    }

    #[test]
    fn test_score_payload_from_chatty_reply() {
        let reply = "Sure! {\"score\": 85, \"feedback\": \"Clear and specific.\"} Let me know.";
        let payload: ScorePayload = parse_json_reply(reply, JsonShape::Object).unwrap();
        assert_eq!(payload.score, 85);
    }

    #[test]
    fn test_fractional_or_negative_score_fails_schema() {
        assert!(parse_json_reply::<ScorePayload>(r#"{"score": 85.5}"#, JsonShape::Object).is_err());
        assert!(parse_json_reply::<ScorePayload>(r#"{"score": -3}"#, JsonShape::Object).is_err());
    }

    #[test]
    fn test_verdict_with_unknown_recommendation_fails() {
        let reply = r#"{"recommendation": "strong_hire", "summary": "Great."}"#;
        assert!(parse_json_reply::<Verdict>(reply, JsonShape::Object).is_err());
    }

    #[test]
    fn test_verdict_requires_summary_text() {
        let verdict: Verdict = parse_json_reply(
            r#"{"recommendation": "not_recommended", "summary": "  "}"#,
            JsonShape::Object,
        )
        .unwrap();
        assert!(validate_verdict(verdict).is_err());

        let verdict: Verdict = parse_json_reply(
            r#"{"recommendation": "not_recommended", "summary": "Needs more depth."}"#,
            JsonShape::Object,
        )
        .unwrap();
        assert_eq!(
            validate_verdict(verdict).unwrap().recommendation,
            Recommendation::NotRecommended
        );
    }

    #[test]
    fn test_format_responses_numbers_questions() {
        let text = format_responses(&[
            Response {
                question: "Why Rust?".to_string(),
                answer: "Safety.".to_string(),
                score: 90,
            },
            Response {
                question: "Why Tokio?".to_string(),
                answer: "Async.".to_string(),
                score: 70,
            },
        ]);
        assert!(text.starts_with("Q1: Why Rust?\nAnswer: Safety.\nScore: 90/100"));
        assert!(text.contains("\n\nQ2: Why Tokio?"));
    }
}
