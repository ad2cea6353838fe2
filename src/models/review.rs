//! Spaced-repetition state: one `ReviewItem` per studied question, plus the
//! append-only log of review sessions.

use super::Difficulty;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How well the user recalled an item. Only `Easy` counts as a successful
/// recall; `Hard` and `Good` take the failure branch like `Again`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewQuality {
    Again = 0,
    Hard = 1,
    Good = 2,
    Easy = 3,
}

impl ReviewQuality {
    pub fn is_success(self) -> bool {
        matches!(self, ReviewQuality::Easy)
    }

    /// Numeric grade fed into the SM-2 ease formula.
    pub fn grade(self) -> f64 {
        self as u8 as f64
    }
}

/// Scheduling state for one question. Created on first study, mutated only
/// by reviews, never deleted (failure resets progress instead).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItem {
    pub question_id: String,
    pub framework: String,
    pub difficulty: Difficulty,
    pub next_review: DateTime<Utc>,
    /// Current spacing in whole days, at least 1.
    pub interval: u32,
    /// Consecutive successful reviews since the last failure.
    pub repetitions: u32,
    /// Multiplier controlling interval growth, floored at 1.3.
    pub ease_factor: f64,
    pub correct_streak: u32,
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl ReviewItem {
    pub fn new(
        question_id: String,
        framework: String,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            question_id,
            framework,
            difficulty,
            next_review: now,
            interval: 1,
            repetitions: 0,
            ease_factor: 2.5,
            correct_streak: 0,
            last_reviewed: None,
        }
    }

    /// An item mastered five times in a row is considered learned.
    pub fn is_mastered(&self) -> bool {
        self.correct_streak >= 5
    }
}

/// One review pass. Closed sessions are never mutated again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub items_reviewed: u32,
    pub correct_answers: u32,
    pub total_answers: u32,
    pub end_time: Option<DateTime<Utc>>,
}

impl ReviewSession {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start_time: now,
            items_reviewed: 0,
            correct_answers: 0,
            total_answers: 0,
            end_time: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_defaults() {
        let now = Utc::now();
        let item = ReviewItem::new("q1".into(), "react".into(), Difficulty::Medium, now);

        assert_eq!(item.interval, 1);
        assert_eq!(item.repetitions, 0);
        assert_eq!(item.ease_factor, 2.5);
        assert_eq!(item.correct_streak, 0);
        assert_eq!(item.next_review, now);
        assert!(item.last_reviewed.is_none());
        assert!(!item.is_mastered());
    }

    #[test]
    fn test_only_easy_is_success() {
        assert!(ReviewQuality::Easy.is_success());
        assert!(!ReviewQuality::Good.is_success());
        assert!(!ReviewQuality::Hard.is_success());
        assert!(!ReviewQuality::Again.is_success());
    }

    #[test]
    fn test_session_starts_open() {
        let session = ReviewSession::new(Utc::now());
        assert!(session.is_open());
        assert_eq!(session.total_answers, 0);
    }
}
