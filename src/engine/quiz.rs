//! Quiz session state machine: question generation, answer/navigation
//! handling, and completion scoring with history + aggregate stats.

use crate::events::{EventBus, StateEvent};
use crate::models::{
    Difficulty, Question, QuizConfig, QuizLevel, QuizMode, QuizOutcome, QuizQuestion, QuizScore,
    QuizSession, QuizStats, ScoreBreakdown,
};
use crate::storage::{KvStore, keys};
use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;

/// Filters the catalog down to the level's difficulty tiers, shuffles
/// uniformly, and keeps at most `count` questions (level default when
/// `None`).
pub fn generate_quiz_questions<R: Rng>(
    level: QuizLevel,
    all_questions: &[Question],
    count: Option<usize>,
    rng: &mut R,
) -> Vec<QuizQuestion> {
    let allowed = level.allowed_difficulties();
    let mut pool: Vec<Question> = all_questions
        .iter()
        .filter(|q| allowed.contains(&q.difficulty))
        .cloned()
        .collect();

    pool.shuffle(rng);
    pool.truncate(count.unwrap_or_else(|| level.default_question_count()));
    pool.into_iter().map(QuizQuestion::new).collect()
}

pub struct QuizEngine {
    store: KvStore,
    bus: Option<EventBus>,
}

impl QuizEngine {
    pub fn new(store: KvStore) -> Self {
        Self { store, bus: None }
    }

    pub fn with_bus(store: KvStore, bus: EventBus) -> Self {
        Self {
            store,
            bus: Some(bus),
        }
    }

    pub fn create_session(&self, config: QuizConfig, questions: Vec<QuizQuestion>) -> QuizSession {
        QuizSession::new(config, questions, Utc::now())
    }

    /// Records an answer for the question at `index`. Out-of-range indices
    /// and completed sessions are logged and ignored.
    pub fn submit_answer(
        &self,
        session: &mut QuizSession,
        index: usize,
        answer: &str,
        time_spent: u64,
    ) {
        if session.is_completed {
            return;
        }
        let Some(question) = session.questions.get_mut(index) else {
            log::warn!(
                "answer submitted for question {index} of {}-question session {}",
                session.questions.len(),
                session.id
            );
            return;
        };

        question.selected_answer = Some(answer.to_string());
        question.time_spent = time_spent;
    }

    /// Advances to the next question, clamped to the last one.
    pub fn next_question(&self, session: &mut QuizSession) {
        let last = session.questions.len().saturating_sub(1);
        session.current_question_index = (session.current_question_index + 1).min(last);
    }

    /// Steps back one question, clamped to the first one.
    pub fn previous_question(&self, session: &mut QuizSession) {
        session.current_question_index = session.current_question_index.saturating_sub(1);
    }

    /// Finalizes the session: scores it, persists it to the history log,
    /// and folds it into the aggregate stats. Returns `None` when the
    /// session was already completed.
    pub fn complete(&self, session: &mut QuizSession) -> Option<QuizOutcome> {
        if session.is_completed {
            return None;
        }

        let now = Utc::now();
        session.end_time = Some(now);
        session.total_time = Some((now - session.start_time).num_milliseconds());
        session.is_completed = true;

        // Scoring counts any answered question as correct; there is no
        // ground-truth comparison at this layer (the interactive engine
        // does the real evaluation).
        for question in &mut session.questions {
            question.is_correct = Some(question.is_answered());
        }

        let score = score_session(session);
        let recommendations = vec![recommendation_for(score.percentage).to_string()];

        let mut stats: QuizStats = self.store.read(keys::QUIZ_STATS, QuizStats::default());
        let achievements = check_achievements(session, &score, &stats);
        update_stats(&mut stats, session.level, score.percentage);
        self.store.write(keys::QUIZ_STATS, &stats);

        let mut history: Vec<QuizSession> = self.store.read(keys::QUIZ_SESSIONS, Vec::new());
        history.push(session.clone());
        self.store.write(keys::QUIZ_SESSIONS, &history);

        if let Some(bus) = &self.bus {
            bus.emit(&StateEvent::QuizCompleted {
                session_id: session.id.clone(),
                percentage: score.percentage,
            });
        }

        Some(QuizOutcome {
            score,
            recommendations,
            achievements,
        })
    }

    pub fn stats(&self) -> QuizStats {
        self.store.read(keys::QUIZ_STATS, QuizStats::default())
    }

    pub fn session_history(&self) -> Vec<QuizSession> {
        self.store.read(keys::QUIZ_SESSIONS, Vec::new())
    }
}

fn score_session(session: &QuizSession) -> QuizScore {
    let mut breakdown = ScoreBreakdown::default();
    let mut correct = 0u32;

    for question in &session.questions {
        let tier = match question.question.difficulty {
            Difficulty::Easy => &mut breakdown.junior,
            Difficulty::Medium => &mut breakdown.intermediate,
            Difficulty::Hard => &mut breakdown.senior,
        };
        tier.total += 1;
        if question.is_correct == Some(true) {
            tier.correct += 1;
            correct += 1;
        }
    }

    let total = session.questions.len() as u32;
    let percentage = if total == 0 {
        0
    } else {
        (correct as f64 * 100.0 / total as f64).round() as u32
    };

    QuizScore {
        correct,
        total,
        percentage,
        breakdown,
    }
}

fn recommendation_for(percentage: u32) -> &'static str {
    if percentage >= 90 {
        "Outstanding result. Move up a level or pick another framework to keep the challenge fresh."
    } else if percentage >= 75 {
        "Solid performance. Revisit the questions you skipped, then retake the quiz to push past 90%."
    } else if percentage >= 60 {
        "A fair run. Go back through study mode for this framework before trying again."
    } else {
        "Plenty of room to grow. Work through study mode and add these questions to spaced repetition before the next attempt."
    }
}

fn check_achievements(session: &QuizSession, score: &QuizScore, stats: &QuizStats) -> Vec<String> {
    let mut achievements = Vec::new();

    if stats.total_quizzes == 0 && session.mode == QuizMode::Quiz {
        achievements.push("First Quiz Completed".to_string());
    }
    if score.percentage == 100 {
        achievements.push("Perfect Score".to_string());
    }
    if let (Some(total_time), len) = (session.total_time, session.questions.len()) {
        if len > 0 && total_time / (len as i64) < 30_000 {
            achievements.push("Speed Demon".to_string());
        }
    }

    achievements
}

fn update_stats(stats: &mut QuizStats, level: QuizLevel, percentage: u32) {
    stats.total_quizzes += 1;
    let n = stats.total_quizzes as f64;
    stats.average_score = (stats.average_score * (n - 1.0) + percentage as f64) / n;
    stats.best_score = stats.best_score.max(percentage);

    let progress = stats.levels.entry(level).or_default();
    progress.attempts += 1;
    progress.best_score = progress.best_score.max(percentage);

    if percentage >= 80 {
        if let Some(next) = level.next() {
            stats.levels.entry(next).or_default().unlocked = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn question(id: &str, difficulty: Difficulty) -> Question {
        Question {
            id: id.to_string(),
            question: format!("Question {id}"),
            answer: format!("Answer {id}"),
            category: None,
            difficulty,
            tags: Vec::new(),
        }
    }

    fn catalog() -> Vec<Question> {
        (0..20)
            .map(|i| {
                let difficulty = match i % 3 {
                    0 => Difficulty::Easy,
                    1 => Difficulty::Medium,
                    _ => Difficulty::Hard,
                };
                question(&format!("q{i}"), difficulty)
            })
            .collect()
    }

    fn session_with(engine: &QuizEngine, count: usize) -> QuizSession {
        let questions = (0..count)
            .map(|i| QuizQuestion::new(question(&format!("q{i}"), Difficulty::Easy)))
            .collect();
        engine.create_session(
            QuizConfig {
                mode: QuizMode::Quiz,
                level: QuizLevel::Junior,
            },
            questions,
        )
    }

    #[test]
    fn test_generation_respects_level_and_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let questions = generate_quiz_questions(QuizLevel::Senior, &catalog(), Some(4), &mut rng);

        assert_eq!(questions.len(), 4);
        assert!(questions
            .iter()
            .all(|q| q.question.difficulty == Difficulty::Hard));
    }

    #[test]
    fn test_generation_uses_level_default_count() {
        let mut rng = StdRng::seed_from_u64(7);
        // 14 junior-eligible questions in the catalog, default count is 10.
        let questions = generate_quiz_questions(QuizLevel::Junior, &catalog(), None, &mut rng);
        assert_eq!(questions.len(), 10);
    }

    #[test]
    fn test_navigation_clamps_at_both_ends() {
        let engine = QuizEngine::new(KvStore::in_memory());
        let mut session = session_with(&engine, 3);

        engine.previous_question(&mut session);
        assert_eq!(session.current_question_index, 0);

        for _ in 0..10 {
            engine.next_question(&mut session);
        }
        assert_eq!(session.current_question_index, 2);
    }

    #[test]
    fn test_out_of_range_answer_is_ignored() {
        let engine = QuizEngine::new(KvStore::in_memory());
        let mut session = session_with(&engine, 2);

        engine.submit_answer(&mut session, 9, "whatever", 5);
        assert!(session.questions.iter().all(|q| q.selected_answer.is_none()));
    }

    #[test]
    fn test_completion_scores_answered_questions() {
        let engine = QuizEngine::new(KvStore::in_memory());
        let mut session = session_with(&engine, 10);

        for i in 0..7 {
            engine.submit_answer(&mut session, i, "an answer", 10);
        }

        let outcome = engine.complete(&mut session).unwrap();
        assert_eq!(outcome.score.correct, 7);
        assert_eq!(outcome.score.total, 10);
        assert_eq!(outcome.score.percentage, 70);
        assert!(session.is_completed);
        assert!(session.end_time.is_some());
    }

    #[test]
    fn test_empty_session_scores_zero() {
        let engine = QuizEngine::new(KvStore::in_memory());
        let mut session = session_with(&engine, 0);

        let outcome = engine.complete(&mut session).unwrap();
        assert_eq!(outcome.score.percentage, 0);
        assert_eq!(outcome.score.total, 0);
    }

    #[test]
    fn test_completing_twice_is_none() {
        let engine = QuizEngine::new(KvStore::in_memory());
        let mut session = session_with(&engine, 1);

        assert!(engine.complete(&mut session).is_some());
        assert!(engine.complete(&mut session).is_none());
        assert_eq!(engine.session_history().len(), 1);
    }

    #[test]
    fn test_first_quiz_and_perfect_score_achievements() {
        let engine = QuizEngine::new(KvStore::in_memory());
        let mut session = session_with(&engine, 2);
        engine.submit_answer(&mut session, 0, "a", 1);
        engine.submit_answer(&mut session, 1, "b", 1);

        let outcome = engine.complete(&mut session).unwrap();
        assert!(outcome
            .achievements
            .contains(&"First Quiz Completed".to_string()));
        assert!(outcome.achievements.contains(&"Perfect Score".to_string()));
        assert!(outcome.achievements.contains(&"Speed Demon".to_string()));

        // Second quiz is no longer the first.
        let mut second = session_with(&engine, 1);
        let outcome = engine.complete(&mut second).unwrap();
        assert!(!outcome
            .achievements
            .contains(&"First Quiz Completed".to_string()));
    }

    #[test]
    fn test_stats_update_and_level_unlock() {
        let engine = QuizEngine::new(KvStore::in_memory());

        let mut session = session_with(&engine, 2);
        engine.submit_answer(&mut session, 0, "a", 1);
        engine.submit_answer(&mut session, 1, "b", 1);
        engine.complete(&mut session).unwrap();

        let stats = engine.stats();
        assert_eq!(stats.total_quizzes, 1);
        assert_eq!(stats.best_score, 100);
        assert_eq!(stats.average_score, 100.0);
        assert!(stats.levels[&QuizLevel::Intermediate].unlocked);
        assert!(!stats.levels[&QuizLevel::Senior].unlocked);

        // A weak second run drags the average down but not the best score.
        let mut weak = session_with(&engine, 2);
        engine.complete(&mut weak).unwrap();
        let stats = engine.stats();
        assert_eq!(stats.total_quizzes, 2);
        assert_eq!(stats.best_score, 100);
        assert_eq!(stats.average_score, 50.0);
    }

    #[test]
    fn test_recommendation_tiers() {
        assert!(recommendation_for(95).starts_with("Outstanding"));
        assert!(recommendation_for(80).starts_with("Solid"));
        assert!(recommendation_for(65).starts_with("A fair run"));
        assert!(recommendation_for(10).starts_with("Plenty of room"));
    }
}
