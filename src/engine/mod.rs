//! # Dispatch Engine
//!
//! The integration layer between the front end and the two stateful
//! subsystems. Each inbound event is first offered to the quiz manager
//! (which claims answers for its origin channel) and otherwise becomes a
//! conversational turn. Hooks return tagged results; the front end renders
//! an error's `Display` text directly to the user. Quiz state mutation
//! always completes before any notification or generation call is issued.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Profile counters and titles hook
//! - 1.1.0: Hint hook
//! - 1.0.0: Initial hooks for message, quiz start/stop, and mode change

use log::{debug, info};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::features::conversation::{ConversationError, ConversationStore};
use crate::features::personas::Mode;
use crate::features::profile::ProfileStore;
use crate::features::quiz::{AnswerOutcome, QuizError, QuizSessionManager, Verdict};
use crate::services::{
    generate_or_fallback, notify_best_effort, DeliveryTarget, Notifier, TextGenerator,
};

/// One event from the external message stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender_id: u64,
    pub sender_name: String,
    pub text: String,
    pub channel_id: u64,
    pub is_direct: bool,
}

/// User-visible error taxonomy. `Display` is the text the front end shows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Easy now, ask me again in {retry_after_secs}s.")]
    RateLimited { retry_after_secs: u64 },
    #[error("I don't know a `{key}` mode. Try one of: {available}.")]
    InvalidMode { key: String, available: String },
    #[error("I have no `{genre}` questions at `{difficulty}` difficulty.")]
    InvalidSelection { genre: String, difficulty: String },
    #[error("A quiz round is already running. Answer that one first!")]
    RoundInProgress,
    #[error("There is no quiz round going on right now.")]
    NoActiveRound,
    #[error("You already used your answer for this round.")]
    AlreadyAnswered,
}

impl From<QuizError> for CoreError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::InvalidSelection { genre, difficulty } => {
                CoreError::InvalidSelection { genre, difficulty }
            }
            QuizError::RoundInProgress => CoreError::RoundInProgress,
            QuizError::NoActiveRound => CoreError::NoActiveRound,
            QuizError::AlreadyAnswered => CoreError::AlreadyAnswered,
        }
    }
}

/// Owns the stateful core and the boundary services. Instantiated once per
/// process and shared by reference with the front end.
pub struct Engine {
    conversations: ConversationStore,
    quiz: QuizSessionManager,
    profiles: ProfileStore,
    generator: Arc<dyn TextGenerator>,
    notifier: Arc<dyn Notifier>,
    owner_id: u64,
}

impl Engine {
    pub fn new(
        conversations: ConversationStore,
        quiz: QuizSessionManager,
        generator: Arc<dyn TextGenerator>,
        notifier: Arc<dyn Notifier>,
        owner_id: u64,
    ) -> Self {
        Self {
            conversations,
            quiz,
            profiles: ProfileStore::new(),
            generator,
            notifier,
            owner_id,
        }
    }

    /// Route one inbound event.
    ///
    /// `Ok(Some(text))` is a reply for the event's channel, `Ok(None)` means
    /// the event was fully handled (or ignored). Quiz acknowledgments and
    /// announcements go out through the notifier instead.
    pub async fn on_message(&self, event: &InboundMessage) -> Result<Option<String>, CoreError> {
        let text = event.text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let request_id = Uuid::new_v4();

        // Quiz answers claim the event before conversation sees it. DMs are
        // never answers; rounds are bound to their origin channel.
        if !event.is_direct {
            if let Some(result) = self.quiz.claim_and_submit(event.sender_id, text, event.channel_id)
            {
                let outcome = result?;
                self.announce_quiz_outcome(event, outcome, request_id).await;
                return Ok(None);
            }
        }

        let is_owner = event.sender_id == self.owner_id;
        let prompt = match self.conversations.record_and_build_prompt(
            event.sender_id,
            &event.sender_name,
            text,
            is_owner,
        ) {
            Ok(prompt) => prompt,
            Err(ConversationError::EmptyMessage) => return Ok(None),
            Err(ConversationError::RateLimited { retry_after_secs }) => {
                debug!(
                    "[{request_id}] rate limited | user: {} | retry in {retry_after_secs}s",
                    event.sender_id
                );
                return Err(CoreError::RateLimited { retry_after_secs });
            }
        };

        self.profiles.note_question(event.sender_id);
        debug!(
            "[{request_id}] conversational turn | user: {} | prompt: {} chars",
            event.sender_id,
            prompt.len()
        );

        // Single attempt; failures become the fixed fallback. The user's
        // utterance is already committed to history either way.
        Ok(Some(
            generate_or_fallback(self.generator.as_ref(), &prompt, request_id).await,
        ))
    }

    /// Start a quiz round. Returns the announcement for the origin channel.
    pub fn on_quiz_start(
        &self,
        genre: &str,
        difficulty: &str,
        channel_id: u64,
        asker_id: u64,
    ) -> Result<String, CoreError> {
        let request_id = Uuid::new_v4();
        let started = self.quiz.start(genre, difficulty, channel_id, asker_id)?;
        info!(
            "[{request_id}] quiz round opened | genre: {genre} | difficulty: {difficulty} | channel: {channel_id} | asker: {asker_id}"
        );

        let mut announcement = format!("Quiz time! {}", started.question);
        if started.has_hint {
            announcement.push_str("\n(Stuck? Ask me for a hint.)");
        }
        Ok(announcement)
    }

    /// Administrative stop; returns the closing text for the origin channel.
    pub fn on_quiz_stop(&self) -> Result<String, CoreError> {
        let request_id = Uuid::new_v4();
        let stopped = self.quiz.force_stop()?;
        info!(
            "[{request_id}] quiz round stopped early | channel: {} | answers: {}",
            stopped.origin_channel, stopped.answered_count
        );
        Ok(format!(
            "Round abandoned. The answer was **{}**.",
            stopped.canonical_answer
        ))
    }

    /// Hint for the active round.
    pub fn on_hint(&self) -> Result<String, CoreError> {
        let hint = self.quiz.hint()?;
        Ok(format!("Hint: {hint}"))
    }

    /// Change the sender's persona mode.
    pub fn on_mode_change(&self, user_id: u64, mode_key: &str) -> Result<Mode, CoreError> {
        let mode = Mode::from_key(mode_key).ok_or_else(|| CoreError::InvalidMode {
            key: mode_key.trim().to_string(),
            available: Mode::available_keys(),
        })?;
        self.conversations.set_mode(user_id, mode);
        info!("mode change | user: {user_id} | mode: {mode}");
        Ok(mode)
    }

    /// Render the sender's earned titles.
    pub fn on_titles(&self, user_id: u64) -> String {
        let titles = self
            .profiles
            .titles_for(user_id, user_id == self.owner_id);
        if titles.is_empty() {
            "No titles yet. Answer quizzes and keep the questions coming!".to_string()
        } else {
            format!("Your titles: {}", titles.join(", "))
        }
    }

    // State is already committed by the time we get here; both sends are
    // best-effort.
    async fn announce_quiz_outcome(
        &self,
        event: &InboundMessage,
        outcome: AnswerOutcome,
        request_id: Uuid,
    ) {
        let correct = outcome.verdict == Verdict::Correct;
        self.profiles.note_quiz_answer(event.sender_id, correct);
        info!(
            "[{request_id}] quiz answer | user: {} | correct: {correct} | answers: {} | closed: {}",
            event.sender_id, outcome.answered_count, outcome.round_closed
        );

        let announcement = if correct {
            format!("{} got it right!", event.sender_name)
        } else {
            format!("{} took a swing and missed.", event.sender_name)
        };
        notify_best_effort(
            self.notifier.as_ref(),
            DeliveryTarget::Channel(outcome.origin_channel),
            &announcement,
            request_id,
        )
        .await;

        let ack = if correct {
            "Correct! Nicely done.".to_string()
        } else {
            format!(
                "Not this time. The answer was **{}**.",
                outcome.canonical_answer
            )
        };
        notify_best_effort(
            self.notifier.as_ref(),
            DeliveryTarget::User(event.sender_id),
            &ack,
            request_id,
        )
        .await;

        if outcome.round_closed {
            let closing = format!(
                "That's {} answers, so the round is closed! The answer was **{}**.",
                outcome.answered_count, outcome.canonical_answer
            );
            notify_best_effort(
                self.notifier.as_ref(),
                DeliveryTarget::Channel(outcome.origin_channel),
                &closing,
                request_id,
            )
            .await;
        }
    }
}
