pub mod interactive;
pub mod question;
pub mod quiz;
pub mod review;
pub mod sm2;

pub use interactive::{
    ChoiceOption, InteractiveAnswer, InteractiveKind, InteractiveOutcome, InteractiveQuestion,
    InteractiveQuizSession, InteractiveScore, TypeScore,
};
pub use question::{Difficulty, Question, QuestionCatalog, QuizLevel};
pub use quiz::{
    LevelProgress, QuizConfig, QuizMode, QuizOutcome, QuizQuestion, QuizScore, QuizSession,
    QuizStats, ScoreBreakdown, TierScore,
};
pub use review::{ReviewItem, ReviewQuality, ReviewSession};
