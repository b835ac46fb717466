//! # Feature: Conversation Context Store
//!
//! Short-term per-user memory feeding the persona-aware prompt builder.
//! Each user gets a bounded FIFO history of their recent turns, a cooldown
//! gate between accepted turns, and a persona mode. Records are created
//! lazily on first message and live for the process lifetime. Uses DashMap
//! so different users never contend.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Per-user persona mode stored on the record
//! - 1.1.0: Cooldown gate with remaining-time reporting
//! - 1.0.0: Initial release with bounded FIFO history

pub mod prompt;

use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::features::personas::{preamble_for, Mode};

/// Maximum turns kept per user; the oldest entry is evicted first.
pub const HISTORY_CAP: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversationError {
    /// The user's cooldown has not elapsed. No state was changed and no
    /// generation call must be made.
    #[error("rate limited, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    /// The message was empty after trimming.
    #[error("empty message")]
    EmptyMessage,
}

#[derive(Debug)]
struct ConversationRecord {
    history: VecDeque<String>,
    last_accepted: Option<Instant>,
    mode: Mode,
}

impl Default for ConversationRecord {
    fn default() -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_CAP),
            last_accepted: None,
            mode: Mode::default(),
        }
    }
}

/// Per-user conversational memory and reply-frequency gate.
pub struct ConversationStore {
    records: DashMap<u64, ConversationRecord>,
    cooldown: Duration,
}

impl ConversationStore {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            records: DashMap::new(),
            cooldown,
        }
    }

    /// Accept a conversational turn and build the generation prompt for it.
    ///
    /// On success the user's utterance is appended to their history (evicting
    /// past [`HISTORY_CAP`]) and the cooldown clock restarts. A rejected turn
    /// mutates nothing. The appended utterance stays in history even if the
    /// caller's generation attempt later fails.
    pub fn record_and_build_prompt(
        &self,
        user_id: u64,
        display_name: &str,
        text: &str,
        is_owner: bool,
    ) -> Result<String, ConversationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyMessage);
        }

        let mut record = self.records.entry(user_id).or_default();
        if let Some(last) = record.last_accepted {
            let elapsed = last.elapsed();
            if elapsed < self.cooldown {
                let remaining = self.cooldown - elapsed;
                return Err(ConversationError::RateLimited {
                    retry_after_secs: remaining.as_millis().div_ceil(1000) as u64,
                });
            }
        }

        record.history.push_back(format!("{display_name}: {text}"));
        while record.history.len() > HISTORY_CAP {
            record.history.pop_front();
        }
        record.last_accepted = Some(Instant::now());

        let preamble = preamble_for(record.mode, is_owner);
        Ok(prompt::build_prompt(preamble, record.history.iter()))
    }

    /// Set the persona mode used for the user's subsequent prompt builds.
    /// Creates the record if the user has never spoken.
    pub fn set_mode(&self, user_id: u64, mode: Mode) {
        self.records.entry(user_id).or_default().mode = mode;
    }

    /// The user's current mode (default for unknown users).
    pub fn mode(&self, user_id: u64) -> Mode {
        self.records
            .get(&user_id)
            .map(|r| r.mode)
            .unwrap_or_default()
    }

    /// Copy of the user's stored history, oldest first.
    pub fn history_snapshot(&self, user_id: u64) -> Vec<String> {
        self.records
            .get(&user_id)
            .map(|r| r.history.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn store_without_cooldown() -> ConversationStore {
        ConversationStore::new(Duration::ZERO)
    }

    #[test]
    fn test_empty_message_rejected_without_state_change() {
        let store = store_without_cooldown();
        assert_eq!(
            store.record_and_build_prompt(1, "alice", "   ", false),
            Err(ConversationError::EmptyMessage)
        );
        assert!(store.history_snapshot(1).is_empty());
    }

    #[test]
    fn test_turn_appends_labeled_utterance() {
        let store = store_without_cooldown();
        let prompt = store
            .record_and_build_prompt(1, "alice", "  hello there  ", false)
            .unwrap();

        assert_eq!(store.history_snapshot(1), vec!["alice: hello there"]);
        assert!(prompt.contains("alice: hello there"));
        assert!(prompt.ends_with("Banter:"));
    }

    #[test]
    fn test_cooldown_blocks_then_clears() {
        let store = ConversationStore::new(Duration::from_millis(80));
        store
            .record_and_build_prompt(1, "alice", "first", false)
            .unwrap();

        // Inside the window: rejected, history untouched.
        let err = store
            .record_and_build_prompt(1, "alice", "second", false)
            .unwrap_err();
        assert!(matches!(err, ConversationError::RateLimited { .. }));
        assert_eq!(store.history_snapshot(1).len(), 1);

        sleep(Duration::from_millis(120));
        store
            .record_and_build_prompt(1, "alice", "second", false)
            .unwrap();
        assert_eq!(store.history_snapshot(1).len(), 2);
    }

    #[test]
    fn test_cooldown_reports_remaining_seconds() {
        let store = ConversationStore::new(Duration::from_secs(5));
        store
            .record_and_build_prompt(1, "alice", "first", false)
            .unwrap();

        match store.record_and_build_prompt(1, "alice", "second", false) {
            Err(ConversationError::RateLimited { retry_after_secs }) => {
                assert!(retry_after_secs >= 1 && retry_after_secs <= 5);
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_cooldown_is_per_user() {
        let store = ConversationStore::new(Duration::from_secs(5));
        store
            .record_and_build_prompt(1, "alice", "hello", false)
            .unwrap();
        store
            .record_and_build_prompt(2, "bob", "hello", false)
            .unwrap();
        assert_eq!(store.history_snapshot(2).len(), 1);
    }

    #[test]
    fn test_history_bounded_to_ten_most_recent_in_order() {
        let store = store_without_cooldown();
        for i in 0..HISTORY_CAP + 5 {
            store
                .record_and_build_prompt(1, "alice", &format!("turn {i}"), false)
                .unwrap();
        }

        let history = store.history_snapshot(1);
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history.first().unwrap(), "alice: turn 5");
        assert_eq!(history.last().unwrap(), "alice: turn 14");
    }

    #[test]
    fn test_mode_changes_prompt_preamble() {
        let store = store_without_cooldown();
        let standard = store
            .record_and_build_prompt(1, "alice", "one", false)
            .unwrap();

        store.set_mode(1, Mode::Taunting);
        let taunting = store
            .record_and_build_prompt(1, "alice", "two", false)
            .unwrap();

        assert_ne!(
            standard.lines().next().unwrap(),
            taunting.lines().next().unwrap()
        );
        assert_eq!(store.mode(1), Mode::Taunting);
    }

    #[test]
    fn test_owner_preamble_wins_over_mode() {
        let store = store_without_cooldown();
        store.set_mode(1, Mode::Taunting);
        let prompt = store
            .record_and_build_prompt(1, "boss", "hello", true)
            .unwrap();
        let as_non_owner = store
            .record_and_build_prompt(2, "guest", "hello", false)
            .unwrap();

        assert_ne!(
            prompt.lines().next().unwrap(),
            as_non_owner.lines().next().unwrap()
        );
    }

    #[test]
    fn test_unknown_user_has_defaults() {
        let store = store_without_cooldown();
        assert_eq!(store.mode(42), Mode::Standard);
        assert!(store.history_snapshot(42).is_empty());
    }
}
