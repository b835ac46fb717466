//! # Feature: User Profiles
//!
//! Lifetime per-user counters and the titles earned from them. Counters are
//! bumped from the event path, so updates are cheap DashMap increments;
//! nothing here persists across restarts.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Initial release with question/quiz counters and three titles

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Title always held by the owner identity.
pub const OWNER_TITLE: &str = "House Genius";
/// Earned at [`TRIVIA_TITLE_THRESHOLD`] correct quiz answers.
pub const TRIVIA_TITLE: &str = "Trivia Scholar";
/// Earned at [`CHATTER_TITLE_THRESHOLD`] questions asked.
pub const CHATTER_TITLE: &str = "Relentless Asker";

pub const TRIVIA_TITLE_THRESHOLD: u64 = 10;
pub const CHATTER_TITLE_THRESHOLD: u64 = 100;

#[derive(Debug, Clone)]
pub struct UserProfile {
    pub questions_asked: u64,
    pub quiz_attempts: u64,
    pub quiz_correct: u64,
    pub last_active: DateTime<Utc>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            questions_asked: 0,
            quiz_attempts: 0,
            quiz_correct: 0,
            last_active: Utc::now(),
        }
    }
}

/// Process-lifetime store of per-user counters.
#[derive(Default)]
pub struct ProfileStore {
    profiles: DashMap<u64, UserProfile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an accepted conversational question.
    pub fn note_question(&self, user_id: u64) {
        let mut profile = self.profiles.entry(user_id).or_default();
        profile.questions_asked += 1;
        profile.last_active = Utc::now();
    }

    /// Count a scored quiz submission.
    pub fn note_quiz_answer(&self, user_id: u64, correct: bool) {
        let mut profile = self.profiles.entry(user_id).or_default();
        profile.quiz_attempts += 1;
        if correct {
            profile.quiz_correct += 1;
        }
        profile.last_active = Utc::now();
    }

    pub fn profile(&self, user_id: u64) -> Option<UserProfile> {
        self.profiles.get(&user_id).map(|p| p.value().clone())
    }

    /// Titles the user currently holds, owner title first.
    pub fn titles_for(&self, user_id: u64, is_owner: bool) -> Vec<&'static str> {
        let mut titles = Vec::new();
        if is_owner {
            titles.push(OWNER_TITLE);
        }
        if let Some(profile) = self.profiles.get(&user_id) {
            if profile.quiz_correct >= TRIVIA_TITLE_THRESHOLD {
                titles.push(TRIVIA_TITLE);
            }
            if profile.questions_asked >= CHATTER_TITLE_THRESHOLD {
                titles.push(CHATTER_TITLE);
            }
        }
        titles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_user_has_no_titles() {
        let store = ProfileStore::new();
        assert!(store.titles_for(1, false).is_empty());
        assert!(store.profile(1).is_none());
    }

    #[test]
    fn test_owner_title_is_unconditional() {
        let store = ProfileStore::new();
        assert_eq!(store.titles_for(1, true), vec![OWNER_TITLE]);
    }

    #[test]
    fn test_question_counter() {
        let store = ProfileStore::new();
        store.note_question(1);
        store.note_question(1);
        assert_eq!(store.profile(1).unwrap().questions_asked, 2);
    }

    #[test]
    fn test_trivia_title_at_threshold() {
        let store = ProfileStore::new();
        for _ in 0..TRIVIA_TITLE_THRESHOLD - 1 {
            store.note_quiz_answer(1, true);
        }
        assert!(store.titles_for(1, false).is_empty());

        store.note_quiz_answer(1, true);
        assert_eq!(store.titles_for(1, false), vec![TRIVIA_TITLE]);
    }

    #[test]
    fn test_incorrect_answers_count_attempts_only() {
        let store = ProfileStore::new();
        store.note_quiz_answer(1, false);
        let profile = store.profile(1).unwrap();
        assert_eq!(profile.quiz_attempts, 1);
        assert_eq!(profile.quiz_correct, 0);
    }

    #[test]
    fn test_chatter_title_at_threshold() {
        let store = ProfileStore::new();
        for _ in 0..CHATTER_TITLE_THRESHOLD {
            store.note_question(1);
        }
        assert_eq!(store.titles_for(1, false), vec![CHATTER_TITLE]);
    }

    #[test]
    fn test_counters_are_per_user() {
        let store = ProfileStore::new();
        store.note_question(1);
        assert!(store.profile(2).is_none());
    }
}
