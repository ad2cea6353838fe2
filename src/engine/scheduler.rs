//! Spaced-repetition scheduler: owns the review items and the session log,
//! persisting both through the key-value store after every mutation.

use crate::events::{EventBus, StateEvent};
use crate::models::sm2;
use crate::models::{Difficulty, ReviewItem, ReviewQuality, ReviewSession};
use crate::storage::{KvStore, keys};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the collection returned by [`Scheduler::stats`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReviewStats {
    pub due: usize,
    /// Due items whose last review lies more than one interval in the past.
    pub overdue: usize,
    pub total: usize,
    pub mastered: usize,
    /// Mastered share of all items, in percent.
    pub mastery_rate: f64,
}

pub struct Scheduler {
    store: KvStore,
    bus: Option<EventBus>,
    items: Vec<ReviewItem>,
    sessions: Vec<ReviewSession>,
}

impl Scheduler {
    pub fn new(store: KvStore) -> Self {
        let items = store.read(keys::SPACED_REPETITION_ITEMS, Vec::new());
        let sessions = store.read(keys::REVIEW_SESSIONS, Vec::new());
        Self {
            store,
            bus: None,
            items,
            sessions,
        }
    }

    pub fn with_bus(store: KvStore, bus: EventBus) -> Self {
        let mut scheduler = Self::new(store);
        scheduler.bus = Some(bus);
        scheduler
    }

    fn persist_items(&self) {
        self.store.write(keys::SPACED_REPETITION_ITEMS, &self.items);
    }

    fn persist_sessions(&self) {
        self.store.write(keys::REVIEW_SESSIONS, &self.sessions);
    }

    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    /// Starts tracking a question. Re-adding a tracked question is a no-op.
    pub fn add_question(&mut self, question_id: &str, framework: &str, difficulty: Difficulty) {
        self.add_question_at(question_id, framework, difficulty, Utc::now());
    }

    pub fn add_question_at(
        &mut self,
        question_id: &str,
        framework: &str,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) {
        if self.items.iter().any(|i| i.question_id == question_id) {
            return;
        }

        self.items.push(ReviewItem::new(
            question_id.to_string(),
            framework.to_string(),
            difficulty,
            now,
        ));
        self.persist_items();
    }

    /// Applies one review and returns the updated item, or `None` when the
    /// question is not tracked.
    pub fn review_item(&mut self, question_id: &str, quality: ReviewQuality) -> Option<ReviewItem> {
        self.review_item_at(question_id, quality, Utc::now())
    }

    pub fn review_item_at(
        &mut self,
        question_id: &str,
        quality: ReviewQuality,
        now: DateTime<Utc>,
    ) -> Option<ReviewItem> {
        let item = self.items.iter_mut().find(|i| i.question_id == question_id)?;
        *item = sm2::apply_review(item, quality, now);
        let updated = item.clone();
        self.persist_items();

        if let Some(bus) = &self.bus {
            bus.emit(&StateEvent::ReviewRecorded {
                question_id: question_id.to_string(),
                success: quality.is_success(),
            });
        }

        Some(updated)
    }

    pub fn due_items(&self) -> Vec<&ReviewItem> {
        self.due_items_at(Utc::now())
    }

    pub fn due_items_at(&self, now: DateTime<Utc>) -> Vec<&ReviewItem> {
        self.items
            .iter()
            .filter(|item| item.next_review <= now)
            .collect()
    }

    pub fn stats(&self) -> ReviewStats {
        self.stats_at(Utc::now())
    }

    pub fn stats_at(&self, now: DateTime<Utc>) -> ReviewStats {
        let due = self.due_items_at(now);
        let overdue = due
            .iter()
            .filter(|item| {
                item.last_reviewed
                    .is_some_and(|last| now - last > Duration::days(item.interval as i64))
            })
            .count();
        let mastered = self.items.iter().filter(|i| i.is_mastered()).count();
        let total = self.items.len();
        let mastery_rate = if total == 0 {
            0.0
        } else {
            mastered as f64 * 100.0 / total as f64
        };

        ReviewStats {
            due: due.len(),
            overdue,
            total,
            mastered,
            mastery_rate,
        }
    }

    /// Opens a review session and returns its id.
    pub fn start_review_session(&mut self) -> String {
        let session = ReviewSession::new(Utc::now());
        let id = session.id.clone();
        self.sessions.push(session);
        self.persist_sessions();
        id
    }

    /// Records one answer against an open session. Unknown or closed
    /// sessions are ignored.
    pub fn record_session_answer(&mut self, session_id: &str, correct: bool) {
        let Some(session) = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id && s.is_open())
        else {
            return;
        };

        session.items_reviewed += 1;
        session.total_answers += 1;
        if correct {
            session.correct_answers += 1;
        }
        self.persist_sessions();
    }

    /// Closes the matching open session; no-op when there is none.
    pub fn complete_review_session(&mut self, session_id: &str) {
        let Some(session) = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id && s.is_open())
        else {
            return;
        };

        session.end_time = Some(Utc::now());
        self.persist_sessions();
    }

    /// Share of correct answers across all closed sessions, in percent.
    /// Zero when nothing has been answered yet.
    pub fn retention_rate(&self) -> f64 {
        let (correct, total) = self
            .sessions
            .iter()
            .filter(|s| !s.is_open())
            .fold((0u32, 0u32), |(c, t), s| {
                (c + s.correct_answers, t + s.total_answers)
            });

        if total == 0 {
            0.0
        } else {
            correct as f64 * 100.0 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::keys;

    fn scheduler() -> Scheduler {
        Scheduler::new(KvStore::in_memory())
    }

    #[test]
    fn test_add_question_is_idempotent() {
        let mut s = scheduler();
        s.add_question("q1", "react", Difficulty::Medium);
        s.add_question("q1", "react", Difficulty::Hard);

        assert_eq!(s.items().len(), 1);
        assert_eq!(s.items()[0].difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_review_untracked_question_is_none() {
        let mut s = scheduler();
        assert!(s.review_item("ghost", ReviewQuality::Easy).is_none());
    }

    #[test]
    fn test_scheduling_scenario() {
        let now = Utc::now();
        let mut s = scheduler();
        s.add_question_at("q1", "react", Difficulty::Medium, now);

        let item = &s.items()[0];
        assert_eq!(item.interval, 1);
        assert_eq!(item.repetitions, 0);
        assert_eq!(item.ease_factor, 2.5);
        assert_eq!(item.next_review, now);

        let first = s.review_item_at("q1", ReviewQuality::Easy, now).unwrap();
        assert_eq!(first.repetitions, 1);
        assert_eq!(first.interval, 1);

        let second = s.review_item_at("q1", ReviewQuality::Easy, now).unwrap();
        assert_eq!(second.repetitions, 2);
        assert_eq!(second.interval, 6);

        let failed = s.review_item_at("q1", ReviewQuality::Hard, now).unwrap();
        assert_eq!(failed.repetitions, 0);
        assert_eq!(failed.interval, 1);
        assert_eq!(failed.correct_streak, 0);
        assert!((failed.ease_factor - (second.ease_factor - 0.2).max(1.3)).abs() < 1e-9);
    }

    #[test]
    fn test_due_and_overdue_counts() {
        let now = Utc::now();
        let mut s = scheduler();
        s.add_question_at("due_now", "react", Difficulty::Easy, now);
        s.add_question_at("later", "react", Difficulty::Easy, now);

        // Push "later" into the future.
        s.review_item_at("later", ReviewQuality::Easy, now);
        assert_eq!(s.due_items_at(now).len(), 1);

        // Reviewed three days ago with a one-day interval: due and overdue.
        s.review_item_at("due_now", ReviewQuality::Again, now - Duration::days(3));
        let stats = s.stats_at(now);
        assert_eq!(stats.due, 1);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.total, 2);
    }

    #[test]
    fn test_mastery_after_five_streak() {
        let now = Utc::now();
        let mut s = scheduler();
        s.add_question_at("q1", "react", Difficulty::Easy, now);
        for _ in 0..5 {
            s.review_item_at("q1", ReviewQuality::Easy, now);
        }

        let stats = s.stats_at(now);
        assert_eq!(stats.mastered, 1);
        assert_eq!(stats.mastery_rate, 100.0);
    }

    #[test]
    fn test_retention_rate_over_closed_sessions() {
        let mut s = scheduler();
        assert_eq!(s.retention_rate(), 0.0);

        let id = s.start_review_session();
        s.record_session_answer(&id, true);
        s.record_session_answer(&id, true);
        s.record_session_answer(&id, false);

        // Open sessions do not count yet.
        assert_eq!(s.retention_rate(), 0.0);

        s.complete_review_session(&id);
        assert!((s.retention_rate() - 200.0 / 3.0).abs() < 1e-9);

        // Closing twice or closing an unknown id changes nothing.
        s.complete_review_session(&id);
        s.complete_review_session("nope");
        assert!((s.retention_rate() - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_items_survive_reload() {
        let store = KvStore::in_memory();
        {
            let mut s = Scheduler::new(store.clone());
            s.add_question("q1", "react", Difficulty::Easy);
        }

        let reloaded = Scheduler::new(store.clone());
        assert_eq!(reloaded.items().len(), 1);

        let raw: Vec<ReviewItem> = store.read(keys::SPACED_REPETITION_ITEMS, Vec::new());
        assert_eq!(raw[0].question_id, "q1");
    }
}
