//! Quiz attempt data: sessions, scores, and the aggregate stats kept across
//! attempts.

use super::{Question, QuizLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    Quiz,
    Practice,
}

/// A catalog question augmented with the user's answer state for one attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(flatten)]
    pub question: Question,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    /// Seconds spent on this question.
    #[serde(default)]
    pub time_spent: u64,
}

impl QuizQuestion {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            selected_answer: None,
            is_correct: None,
            time_spent: 0,
        }
    }

    /// Whether the user gave any non-empty answer.
    pub fn is_answered(&self) -> bool {
        self.selected_answer
            .as_deref()
            .is_some_and(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuizConfig {
    pub mode: QuizMode,
    pub level: QuizLevel,
}

/// One quiz attempt. Mutable while in progress, frozen once completed and
/// appended to the session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: String,
    pub mode: QuizMode,
    pub level: QuizLevel,
    pub questions: Vec<QuizQuestion>,
    pub current_question_index: usize,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Milliseconds from start to completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<i64>,
    pub is_completed: bool,
}

impl QuizSession {
    pub fn new(config: QuizConfig, questions: Vec<QuizQuestion>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            mode: config.mode,
            level: config.level,
            questions,
            current_question_index: 0,
            start_time: now,
            end_time: None,
            total_time: None,
            is_completed: false,
        }
    }
}

/// Correct/total pair for one difficulty bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierScore {
    pub correct: u32,
    pub total: u32,
}

/// Per-level buckets of the score: Easy questions count toward `junior`,
/// Medium toward `intermediate`, Hard toward `senior`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub junior: TierScore,
    pub intermediate: TierScore,
    pub senior: TierScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizScore {
    pub correct: u32,
    pub total: u32,
    /// Rounded to whole percent, 0 when the session had no questions.
    pub percentage: u32,
    pub breakdown: ScoreBreakdown,
}

/// Everything `complete` hands back to the caller besides the mutated session.
#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub score: QuizScore,
    pub recommendations: Vec<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LevelProgress {
    pub attempts: u32,
    pub best_score: u32,
    pub unlocked: bool,
}

/// Aggregate stats across completed quiz-mode and practice-mode attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizStats {
    pub total_quizzes: u32,
    pub average_score: f64,
    pub best_score: u32,
    pub levels: BTreeMap<QuizLevel, LevelProgress>,
}

impl Default for QuizStats {
    fn default() -> Self {
        let mut levels = BTreeMap::new();
        levels.insert(
            QuizLevel::Junior,
            LevelProgress {
                unlocked: true,
                ..LevelProgress::default()
            },
        );
        levels.insert(QuizLevel::Intermediate, LevelProgress::default());
        levels.insert(QuizLevel::Senior, LevelProgress::default());

        Self {
            total_quizzes: 0,
            average_score: 0.0,
            best_score: 0,
            levels,
        }
    }
}
