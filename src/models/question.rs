//! Question records and the framework catalogs that group them.
//! A catalog is treated as read-only input: the engines consume it but
//! never modify it.

use serde::{Deserialize, Serialize};

/// Difficulty tier stored on each question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Quiz level selected by the user. Each level admits one or two
/// difficulty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizLevel {
    Junior,
    Intermediate,
    Senior,
}

impl QuizLevel {
    /// Difficulty tiers a question must fall into to appear at this level.
    pub fn allowed_difficulties(self) -> &'static [Difficulty] {
        match self {
            QuizLevel::Junior => &[Difficulty::Easy, Difficulty::Medium],
            QuizLevel::Intermediate => &[Difficulty::Medium, Difficulty::Hard],
            QuizLevel::Senior => &[Difficulty::Hard],
        }
    }

    /// Question count used when the caller does not request one.
    pub fn default_question_count(self) -> usize {
        match self {
            QuizLevel::Junior => 10,
            QuizLevel::Intermediate => 15,
            QuizLevel::Senior => 20,
        }
    }

    /// The level unlocked after scoring well at this one, if any.
    pub fn next(self) -> Option<QuizLevel> {
        match self {
            QuizLevel::Junior => Some(QuizLevel::Intermediate),
            QuizLevel::Intermediate => Some(QuizLevel::Senior),
            QuizLevel::Senior => None,
        }
    }
}

/// One catalog entry: a question with its model answer and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// All questions for one framework (react, angular, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionCatalog {
    pub framework: String,
    pub questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn question_ids(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.id.clone()).collect()
    }
}
