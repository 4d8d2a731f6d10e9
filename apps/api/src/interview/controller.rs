//! Session controller: one tokio task per interview.
//!
//! The task owns the `InterviewSession` outright and is the only caller of the
//! AI services for that session. Handlers talk to it through a `SessionHandle`:
//! submissions go in over an mpsc channel, snapshots come out over a watch
//! channel.
//!
//! The countdown is an interval that exists only inside the answering wait.
//! Leaving `Answering` drops it, so a stale tick can never reach a session that
//! is evaluating or finalizing. Re-entering `Answering` starts a fresh one whose
//! first tick lands after whatever was left of the interrupted second.
//!
//! A finished session stays in the registry for `DONE_RETENTION` so its final
//! snapshot can still be read, then removes itself.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::candidates::CandidateIdentity;
use crate::interview::models::{Phase, SessionResult, SessionSnapshot};
use crate::interview::registry::SessionRegistry;
use crate::interview::services::InterviewServices;
use crate::interview::session::{Advance, InterviewSession, PendingAnswer, SessionError, Tick};
use crate::results::ResultStore;

const TICK: Duration = Duration::from_secs(1);
const COMMAND_BUFFER: usize = 8;
/// How long a `Done` session stays readable before leaving the registry.
pub const DONE_RETENTION: Duration = Duration::from_secs(30);

type Reply = oneshot::Sender<Result<SessionSnapshot, SessionError>>;

enum Command {
    Submit { answer: String, reply: Reply },
}

/// Cloneable handle to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    id: Uuid,
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Waits until the published snapshot satisfies `ready`.
    /// Returns the last snapshot if the controller has already exited.
    pub async fn wait_until(&self, ready: impl FnMut(&SessionSnapshot) -> bool) -> SessionSnapshot {
        let mut snapshots = self.snapshots.clone();
        let outcome = snapshots.wait_for(ready).await.map(|s| s.clone());
        match outcome {
            Ok(snapshot) => snapshot,
            Err(_) => self.snapshot(),
        }
    }

    /// Waits for question loading to finish.
    pub async fn ready(&self) -> SessionSnapshot {
        self.wait_until(|s| s.phase != Phase::LoadingQuestions).await
    }

    /// Submits an answer for the current question. Resolves once the answer has
    /// been scored, and after finalization when it was the last question.
    pub async fn submit(&self, answer: String) -> Result<SessionSnapshot, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Submit { answer, reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)?
    }
}

/// Registers a new session and starts its task.
/// The task loads questions immediately, persists the result when done and
/// deregisters itself after `DONE_RETENTION`.
pub async fn spawn_session(
    identity: CandidateIdentity,
    domain: String,
    services: InterviewServices,
    store: Arc<dyn ResultStore>,
    registry: SessionRegistry,
    duration_secs: u32,
) -> SessionHandle {
    let id = Uuid::new_v4();
    let identity = identity.with_domain(domain.clone());
    let session = InterviewSession::new(id, identity, domain);

    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

    let handle = SessionHandle {
        id,
        commands: command_tx,
        snapshots: snapshot_rx,
    };
    // Registered before the task runs so deregistration can never come first.
    registry.insert(handle.clone()).await;

    let controller = SessionController {
        session,
        services,
        store,
        registry,
        duration_secs,
        tick_offset: TICK,
        commands: command_rx,
        accepting: true,
        snapshots: snapshot_tx,
    };
    tokio::spawn(controller.run());

    handle
}

struct SessionController {
    session: InterviewSession,
    services: InterviewServices,
    store: Arc<dyn ResultStore>,
    registry: SessionRegistry,
    duration_secs: u32,
    /// Delay to the first tick when the answering wait is (re)entered.
    tick_offset: Duration,
    commands: mpsc::Receiver<Command>,
    /// False once every handle has been dropped; the clock still runs to expiry.
    accepting: bool,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl SessionController {
    async fn run(mut self) {
        let id = self.session.id();
        let domain = self.session.domain().to_string();
        let name = self.session.identity().full_name.clone();

        let services = self.services.clone();
        let questions = self
            .while_busy(async move { services.load_questions(&domain, &name).await })
            .await;
        self.session.begin(questions, self.duration_secs);
        self.publish();
        info!("Session {id} started for {}", self.session.domain());

        // Held back until finalization so the last submitter sees the result.
        let mut final_reply: Option<Reply> = None;

        loop {
            match self.session.phase() {
                Phase::Answering => {
                    let Some((pending, reply)) = self.await_answer().await else {
                        continue;
                    };
                    match self.evaluate(pending).await {
                        Advance::NextQuestion => {
                            let _ = reply.send(Ok(self.session.snapshot()));
                        }
                        Advance::Finalize => final_reply = Some(reply),
                    }
                }
                Phase::Finalizing => {
                    let result = self.finalize().await;
                    self.persist(&result).await;
                    self.publish();
                    if let Some(reply) = final_reply.take() {
                        let _ = reply.send(Ok(self.session.snapshot()));
                    }
                    info!(
                        "Session {id} done: score={} recommendation={}",
                        result.score, result.recommendation
                    );
                    break;
                }
                Phase::LoadingQuestions | Phase::Evaluating | Phase::Done => break,
            }
        }

        // Closes the command channel; late submissions see `Closed`.
        let registry = self.registry.clone();
        drop(self);
        tokio::time::sleep(DONE_RETENTION).await;
        registry.remove(id).await;
        debug!("Session {id} released");
    }

    /// Runs the countdown and waits for an acceptable submission.
    /// Returns `None` when the clock expired instead.
    async fn await_answer(&mut self) -> Option<(PendingAnswer, Reply)> {
        let mut next_tick = Instant::now() + self.tick_offset;
        let mut countdown = interval_at(next_tick, TICK);
        countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                fired = countdown.tick() => {
                    next_tick = fired + TICK;
                    let tick = self.session.tick();
                    self.publish();
                    match tick {
                        Tick::Expired => {
                            info!(
                                "Session {} timed out after {} answers",
                                self.session.id(),
                                self.session.responses().len()
                            );
                            return None;
                        }
                        Tick::Running(remaining) if remaining % 300 == 0 => {
                            debug!("Session {} has {remaining}s remaining", self.session.id());
                        }
                        Tick::Running(_) | Tick::Ignored => {}
                    }
                }
                command = self.commands.recv(), if self.accepting => match command {
                    Some(Command::Submit { answer, reply }) => {
                        match self.session.begin_submission(&answer) {
                            Ok(pending) => {
                                self.tick_offset = next_tick.saturating_duration_since(Instant::now());
                                self.publish();
                                return Some((pending, reply));
                            }
                            Err(err) => {
                                let _ = reply.send(Err(err));
                            }
                        }
                    }
                    None => self.accepting = false,
                },
            }
        }
    }

    async fn evaluate(&mut self, pending: PendingAnswer) -> Advance {
        let services = self.services.clone();
        let domain = self.session.domain().to_string();
        let (question, answer) = (pending.question.clone(), pending.answer.clone());

        let score = self
            .while_busy(async move { services.score_answer(&question, &answer, &domain).await })
            .await;
        let advance = self.session.record_response(pending, score);
        self.publish();
        advance
    }

    async fn finalize(&mut self) -> SessionResult {
        let services = self.services.clone();
        let name = self.session.identity().full_name.clone();
        let domain = self.session.domain().to_string();
        let responses = self.session.responses().to_vec();
        let average = self.session.average_score();
        self.publish();

        let verdict = self
            .while_busy(async move { services.summarize(&name, &domain, &responses, average).await })
            .await;
        self.session.finish(verdict)
    }

    /// Hands the result to the store. Failure is a warning only.
    async fn persist(&mut self, result: &SessionResult) {
        match self.store.save(result).await {
            Ok(result_id) => {
                self.session.set_result_id(result_id);
                info!("Stored result {result_id} for {}", result.identity.registration_no);
            }
            Err(e) => warn!(
                "Failed to store result for {}: {e}",
                result.identity.registration_no
            ),
        }
    }

    /// Drives `work` to completion, rejecting any submission that arrives meanwhile.
    async fn while_busy<F: Future>(&mut self, work: F) -> F::Output {
        tokio::pin!(work);
        loop {
            tokio::select! {
                output = &mut work => return output,
                command = self.commands.recv(), if self.accepting => match command {
                    Some(Command::Submit { reply, .. }) => {
                        let _ = reply.send(Err(SessionError::NotAnswering(self.session.phase())));
                    }
                    None => self.accepting = false,
                },
            }
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.session.snapshot());
    }
}
