//! Feature modules: the quiz and conversation core plus supporting
//! persona and profile state.

pub mod conversation;
pub mod personas;
pub mod profile;
pub mod quiz;

pub use conversation::{ConversationError, ConversationStore, HISTORY_CAP};
pub use personas::Mode;
pub use profile::{ProfileStore, UserProfile};
pub use quiz::{
    AnswerOutcome, QuizCatalog, QuizError, QuizQuestion, QuizSessionManager, RoundStarted,
    StoppedRound, Verdict, DEFAULT_ROUND_CAP,
};
