//! # Feature: Quiz Sessions
//!
//! Runs exactly one trivia round at a time across any number of
//! participants, with at-most-once scoring per participant per round. The
//! manager is an explicit service object owning the single session slot
//! behind one mutex; every read-modify-write of the session (membership
//! check, insert, possible closure) happens atomically under that lock, and
//! no I/O is ever performed while it is held.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 2.0.0: Rounds close after a configurable number of answers instead of on first correct
//! - 1.1.0: Round hints
//! - 1.0.0: Initial release with per-user single-attempt scoring

pub mod catalog;

pub use catalog::{QuizCatalog, QuizQuestion};

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Default number of answers that close a round.
pub const DEFAULT_ROUND_CAP: usize = 10;

const NO_HINT: &str = "No hint for this one.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    /// Genre/difficulty pair not present in the catalog. No state change.
    #[error("no questions for genre `{genre}` at difficulty `{difficulty}`")]
    InvalidSelection { genre: String, difficulty: String },
    /// A round is already active; rounds are strictly serialized.
    #[error("a round is already in progress")]
    RoundInProgress,
    /// The operation needs an active round and there is none.
    #[error("no round is active")]
    NoActiveRound,
    /// The user already spent their one attempt this round.
    #[error("already answered this round")]
    AlreadyAnswered,
}

#[derive(Debug)]
struct QuizSession {
    question: String,
    answer: String,
    hint: Option<String>,
    origin_channel: u64,
    asker_id: u64,
    answered: HashSet<u64>,
}

/// A round was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundStarted {
    pub question: String,
    pub has_hint: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Result of one scored submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub verdict: Verdict,
    /// Canonical answer, for display in acknowledgments and closing
    /// announcements.
    pub canonical_answer: String,
    pub origin_channel: u64,
    /// Users scored so far this round, including this one.
    pub answered_count: usize,
    /// True when this submission reached the cap and closed the round.
    pub round_closed: bool,
}

/// A round was discarded by `force_stop`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoppedRound {
    pub canonical_answer: String,
    pub origin_channel: u64,
    pub answered_count: usize,
}

/// Owns the process-wide quiz round. At most one session exists at any
/// time; starting is mutually exclusive with an active round.
pub struct QuizSessionManager {
    catalog: QuizCatalog,
    round_cap: usize,
    active: Mutex<Option<QuizSession>>,
}

impl QuizSessionManager {
    pub fn new(catalog: QuizCatalog, round_cap: usize) -> Self {
        Self {
            catalog,
            round_cap: round_cap.max(1),
            active: Mutex::new(None),
        }
    }

    // The guard is recovered on poison: sessions are only mutated in
    // complete steps under the lock, so the state is always consistent.
    fn slot(&self) -> MutexGuard<'_, Option<QuizSession>> {
        match self.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Start a round. Validates the selection against the catalog before
    /// taking the slot; concurrent starts admit exactly one winner.
    pub fn start(
        &self,
        genre: &str,
        difficulty: &str,
        origin_channel: u64,
        asker_id: u64,
    ) -> Result<RoundStarted, QuizError> {
        let question = self.catalog.pick(genre, difficulty).cloned().ok_or_else(|| {
            QuizError::InvalidSelection {
                genre: genre.trim().to_string(),
                difficulty: difficulty.trim().to_string(),
            }
        })?;

        let mut slot = self.slot();
        if slot.is_some() {
            return Err(QuizError::RoundInProgress);
        }
        let started = RoundStarted {
            question: question.question.clone(),
            has_hint: question.hint.is_some(),
        };
        *slot = Some(QuizSession {
            question: question.question,
            answer: question.answer,
            hint: question.hint,
            origin_channel,
            asker_id,
            answered: HashSet::new(),
        });
        Ok(started)
    }

    /// Claim and score a message if the active round owns its channel.
    ///
    /// Returns `None` when no round is active or the message came from a
    /// different channel; the event then belongs to the conversational
    /// engine. Claiming and scoring share one lock acquisition so a round
    /// closing under a concurrent submission cannot strand the caller.
    pub fn claim_and_submit(
        &self,
        user_id: u64,
        text: &str,
        source_channel: u64,
    ) -> Option<Result<AnswerOutcome, QuizError>> {
        let mut slot = self.slot();
        let session = slot.as_mut()?;
        if session.origin_channel != source_channel {
            return None;
        }

        if !session.answered.insert(user_id) {
            return Some(Err(QuizError::AlreadyAnswered));
        }

        let verdict = if normalize(text) == normalize(&session.answer) {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        };
        let answered_count = session.answered.len();
        let round_closed = answered_count >= self.round_cap;
        let outcome = AnswerOutcome {
            verdict,
            canonical_answer: session.answer.clone(),
            origin_channel: session.origin_channel,
            answered_count,
            round_closed,
        };
        if round_closed {
            *slot = None;
        }
        Some(Ok(outcome))
    }

    /// Score a submission against the active round.
    pub fn submit(
        &self,
        user_id: u64,
        text: &str,
        source_channel: u64,
    ) -> Result<AnswerOutcome, QuizError> {
        self.claim_and_submit(user_id, text, source_channel)
            .unwrap_or(Err(QuizError::NoActiveRound))
    }

    /// Hint text for the active round.
    pub fn hint(&self) -> Result<String, QuizError> {
        let slot = self.slot();
        let session = slot.as_ref().ok_or(QuizError::NoActiveRound)?;
        Ok(session
            .hint
            .clone()
            .unwrap_or_else(|| NO_HINT.to_string()))
    }

    /// Administrative stop: discard the active round immediately.
    pub fn force_stop(&self) -> Result<StoppedRound, QuizError> {
        let mut slot = self.slot();
        let session = slot.take().ok_or(QuizError::NoActiveRound)?;
        Ok(StoppedRound {
            canonical_answer: session.answer,
            origin_channel: session.origin_channel,
            answered_count: session.answered.len(),
        })
    }

    pub fn is_active(&self) -> bool {
        self.slot().is_some()
    }

    /// The question text of the active round, if any.
    pub fn active_question(&self) -> Option<String> {
        self.slot().as_ref().map(|s| s.question.clone())
    }

    /// The user who started the active round, if any.
    pub fn active_asker(&self) -> Option<u64> {
        self.slot().as_ref().map(|s| s.asker_id)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
