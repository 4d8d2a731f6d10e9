//! Interview session state machine.
//!
//! Pure and synchronous: the controller feeds it service outcomes and clock
//! ticks, and it decides the next phase. It never calls out.
//!
//! ```text
//! LoadingQuestions --begin--> Answering --submit--> Evaluating --record--> Answering
//!                                 |                                 \
//!                                 +--tick reaches 0--> Finalizing <--+ (last question)
//!                                                          |
//!                                                        finish --> Done
//! ```

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::candidates::CandidateIdentity;
use crate::interview::models::{Phase, Response, SessionResult, SessionSnapshot, Verdict};
use crate::interview::scoring::average_score;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please provide an answer before continuing")]
    EmptyAnswer,

    #[error("Session is not accepting answers while {0}")]
    NotAnswering(Phase),

    #[error("Session is closed")]
    Closed,
}

/// An accepted submission waiting for its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAnswer {
    pub question: String,
    pub answer: String,
}

/// Where the session went after recording a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextQuestion,
    Finalize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running(u32),
    Expired,
    /// The clock only runs while answering.
    Ignored,
}

#[derive(Debug)]
pub struct InterviewSession {
    id: Uuid,
    identity: CandidateIdentity,
    domain: String,
    questions: Vec<String>,
    current_index: usize,
    responses: Vec<Response>,
    time_remaining: u32,
    phase: Phase,
    result: Option<SessionResult>,
    result_id: Option<Uuid>,
}

impl InterviewSession {
    pub fn new(id: Uuid, identity: CandidateIdentity, domain: String) -> Self {
        Self {
            id,
            identity,
            domain,
            questions: Vec::new(),
            current_index: 0,
            responses: Vec::new(),
            time_remaining: 0,
            phase: Phase::LoadingQuestions,
            result: None,
            result_id: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn identity(&self) -> &CandidateIdentity {
        &self.identity
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Installs the question list and starts the clock.
    /// An empty list would leave nothing to answer, so it goes straight to finalizing.
    pub fn begin(&mut self, questions: Vec<String>, duration_secs: u32) {
        debug_assert_eq!(self.phase, Phase::LoadingQuestions);
        self.questions = questions;
        self.current_index = 0;
        self.time_remaining = duration_secs;
        self.phase = if self.questions.is_empty() || duration_secs == 0 {
            Phase::Finalizing
        } else {
            Phase::Answering
        };
    }

    /// Accepts a submission for the current question and moves to `Evaluating`.
    /// A blank answer or a submission outside `Answering` leaves the session untouched.
    pub fn begin_submission(&mut self, raw_answer: &str) -> Result<PendingAnswer, SessionError> {
        if self.phase != Phase::Answering {
            return Err(SessionError::NotAnswering(self.phase));
        }

        let answer = raw_answer.trim();
        if answer.is_empty() {
            return Err(SessionError::EmptyAnswer);
        }

        self.phase = Phase::Evaluating;
        Ok(PendingAnswer {
            question: self.questions[self.current_index].clone(),
            answer: answer.to_string(),
        })
    }

    /// Appends the scored response and advances to the next question or to finalization.
    pub fn record_response(&mut self, pending: PendingAnswer, score: u32) -> Advance {
        debug_assert_eq!(self.phase, Phase::Evaluating);
        self.responses.push(Response {
            question: pending.question,
            answer: pending.answer,
            score,
        });

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.phase = Phase::Answering;
            Advance::NextQuestion
        } else {
            self.phase = Phase::Finalizing;
            Advance::Finalize
        }
    }

    /// One second of countdown. Reaching zero forces finalization with whatever was collected.
    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::Answering {
            return Tick::Ignored;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.phase = Phase::Finalizing;
            Tick::Expired
        } else {
            Tick::Running(self.time_remaining)
        }
    }

    pub fn average_score(&self) -> u32 {
        average_score(&self.responses)
    }

    /// Builds the final result from the verdict and closes the session.
    pub fn finish(&mut self, verdict: Verdict) -> SessionResult {
        debug_assert_eq!(self.phase, Phase::Finalizing);
        let result = SessionResult {
            identity: self.identity.clone(),
            domain: self.domain.clone(),
            responses: self.responses.clone(),
            score: self.average_score(),
            recommendation: verdict.recommendation,
            summary: verdict.summary,
            completed_at: Utc::now(),
        };
        self.phase = Phase::Done;
        self.result = Some(result.clone());
        result
    }

    pub fn set_result_id(&mut self, id: Uuid) {
        self.result_id = Some(id);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let current_question = match self.phase {
            Phase::Answering | Phase::Evaluating => self.questions.get(self.current_index).cloned(),
            _ => None,
        };

        SessionSnapshot {
            session_id: self.id,
            phase: self.phase,
            domain: self.domain.clone(),
            current_index: self.current_index,
            total_questions: self.questions.len(),
            current_question,
            time_remaining: self.time_remaining,
            answered: self.responses.len(),
            result: self.result.clone(),
            result_id: self.result_id,
        }
    }
}
