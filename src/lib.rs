// Core layer - configuration
pub mod core;

// Features layer - conversation, personas, profiles, quiz
pub mod features;

// Service boundary - generation and delivery collaborators
pub mod services;

// Application layer - dispatch between quiz and conversation
pub mod engine;

// Re-export core config
pub use core::Config;

// Re-export the dispatch surface
pub use engine::{CoreError, Engine, InboundMessage};

// Re-export feature items
pub use features::{
    // Conversation
    ConversationError, ConversationStore, HISTORY_CAP,
    // Personas
    Mode,
    // Profiles
    ProfileStore, UserProfile,
    // Quiz
    AnswerOutcome, QuizCatalog, QuizError, QuizQuestion, QuizSessionManager, Verdict,
};

// Re-export service contracts
pub use services::{DeliveryTarget, Notifier, TextGenerator, FALLBACK_REPLY};
