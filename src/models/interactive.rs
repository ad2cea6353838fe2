//! Interactive quiz data: the richer question-type model and its sessions.
//! Unlike the plain quiz, every kind carries ground-truth data that the
//! engine checks answers against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One option of a multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// Correctness data per question kind. The serialized tag matches the
/// store's historical `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InteractiveKind {
    MultipleChoice {
        options: Vec<ChoiceOption>,
    },
    FillBlank {
        correct_answer: String,
    },
    MultipleCheckbox {
        options: Vec<String>,
        correct_answers: Vec<String>,
    },
    TrueFalse {
        /// Stored as the string "true" or "false" and compared
        /// case-insensitively against the submitted answer.
        correct_answer: String,
    },
}

impl InteractiveKind {
    pub fn label(&self) -> &'static str {
        match self {
            InteractiveKind::MultipleChoice { .. } => "multiple-choice",
            InteractiveKind::FillBlank { .. } => "fill-blank",
            InteractiveKind::MultipleCheckbox { .. } => "multiple-checkbox",
            InteractiveKind::TrueFalse { .. } => "true-false",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractiveQuestion {
    pub id: String,
    pub prompt: String,
    pub points: u32,
    #[serde(flatten)]
    pub kind: InteractiveKind,
}

/// A submitted answer: a single string or, for checkbox questions, a set of
/// selected option strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InteractiveAnswer {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractiveQuizSession {
    pub id: String,
    pub questions: Vec<InteractiveQuestion>,
    pub current_question_index: usize,
    /// Answers keyed by question id; unanswered questions are absent.
    pub answers: BTreeMap<String, InteractiveAnswer>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub is_completed: bool,
}

impl InteractiveQuizSession {
    pub fn new(questions: Vec<InteractiveQuestion>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            questions,
            current_question_index: 0,
            answers: BTreeMap::new(),
            start_time: now,
            end_time: None,
            is_completed: false,
        }
    }
}

/// Correct/total/percentage for one question kind.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TypeScore {
    pub correct: u32,
    pub total: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractiveScore {
    /// Sum of `points` over correctly answered questions.
    pub score: u32,
    pub total_points: u32,
    pub percentage: u32,
    pub correct_answers: u32,
    pub breakdown: BTreeMap<String, TypeScore>,
}

#[derive(Debug, Clone)]
pub struct InteractiveOutcome {
    pub score: InteractiveScore,
    pub recommendations: Vec<String>,
}
