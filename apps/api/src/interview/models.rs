use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::candidates::CandidateIdentity;

/// One answered question. Appended once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub question: String,
    pub answer: String,
    pub score: u32, // 0 – 100
}

/// Binary hiring signal attached to a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Recommended,
    NotRecommended,
}

impl Recommendation {
    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::Recommended => "recommended",
            Recommendation::NotRecommended => "not_recommended",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recommendation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Recommendation::Recommended),
            "not_recommended" => Ok(Recommendation::NotRecommended),
            other => Err(format!("unknown recommendation '{other}'")),
        }
    }
}

/// Recommendation and prose summary for a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub recommendation: Recommendation,
    pub summary: String,
}

/// The record handed to the result store when a session finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub identity: CandidateIdentity,
    pub domain: String,
    pub responses: Vec<Response>,
    pub score: u32,
    pub recommendation: Recommendation,
    pub summary: String,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    LoadingQuestions,
    Answering,
    Evaluating,
    Finalizing,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::LoadingQuestions => "loading questions",
            Phase::Answering => "answering",
            Phase::Evaluating => "evaluating",
            Phase::Finalizing => "finalizing",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Read-only view of a session, published after every state change.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub phase: Phase,
    pub domain: String,
    pub current_index: usize,
    pub total_questions: usize,
    pub current_question: Option<String>,
    pub time_remaining: u32,
    pub answered: usize,
    /// Present once the session is done.
    pub result: Option<SessionResult>,
    /// Store id of the result; absent if persistence failed.
    pub result_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Recommendation::NotRecommended).unwrap(),
            r#""not_recommended""#
        );
        let parsed: Recommendation = serde_json::from_str(r#""recommended""#).unwrap();
        assert_eq!(parsed, Recommendation::Recommended);
    }

    #[test]
    fn test_recommendation_rejects_unknown_label() {
        assert!(serde_json::from_str::<Recommendation>(r#""maybe""#).is_err());
        assert!("Recommended".parse::<Recommendation>().is_err());
    }

    #[test]
    fn test_recommendation_round_trips_through_str() {
        for rec in [Recommendation::Recommended, Recommendation::NotRecommended] {
            assert_eq!(rec.as_str().parse::<Recommendation>().unwrap(), rec);
        }
    }
}
