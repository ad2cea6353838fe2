//! Interactive quiz state machine. Same two-state lifecycle as the plain
//! quiz, but answers are checked per question kind against ground-truth
//! data, and scoring is points-weighted.

use crate::models::{
    InteractiveAnswer, InteractiveKind, InteractiveOutcome, InteractiveQuestion,
    InteractiveQuizSession, InteractiveScore, TypeScore,
};
use crate::storage::{KvStore, keys};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};

pub struct InteractiveQuizEngine {
    store: KvStore,
}

impl InteractiveQuizEngine {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    pub fn create_session(&self, questions: Vec<InteractiveQuestion>) -> InteractiveQuizSession {
        InteractiveQuizSession::new(questions, Utc::now())
    }

    /// Records the answer for a question. Ignored once the session is
    /// completed.
    pub fn submit_answer(
        &self,
        session: &mut InteractiveQuizSession,
        question_id: &str,
        answer: InteractiveAnswer,
    ) {
        if session.is_completed {
            return;
        }
        session.answers.insert(question_id.to_string(), answer);
    }

    pub fn next_question(&self, session: &mut InteractiveQuizSession) {
        let last = session.questions.len().saturating_sub(1);
        session.current_question_index = (session.current_question_index + 1).min(last);
    }

    pub fn previous_question(&self, session: &mut InteractiveQuizSession) {
        session.current_question_index = session.current_question_index.saturating_sub(1);
    }

    /// Finalizes the session and appends it to the interactive history log.
    /// Returns `None` when already completed. Unlike the plain quiz, this
    /// variant keeps no aggregate stats.
    pub fn complete(&self, session: &mut InteractiveQuizSession) -> Option<InteractiveOutcome> {
        if session.is_completed {
            return None;
        }

        session.end_time = Some(Utc::now());
        session.is_completed = true;

        let score = score_session(session);
        let recommendations = build_recommendations(&score);

        let mut history: Vec<InteractiveQuizSession> =
            self.store.read(keys::INTERACTIVE_QUIZ_SESSIONS, Vec::new());
        history.push(session.clone());
        self.store.write(keys::INTERACTIVE_QUIZ_SESSIONS, &history);

        Some(InteractiveOutcome {
            score,
            recommendations,
        })
    }

    pub fn session_history(&self) -> Vec<InteractiveQuizSession> {
        self.store.read(keys::INTERACTIVE_QUIZ_SESSIONS, Vec::new())
    }
}

/// Checks one answer against the question's ground truth.
pub fn evaluate_answer(question: &InteractiveQuestion, answer: &InteractiveAnswer) -> bool {
    match (&question.kind, answer) {
        (InteractiveKind::MultipleChoice { options }, InteractiveAnswer::One(selected)) => options
            .iter()
            .find(|o| o.is_correct)
            .is_some_and(|o| o.id == *selected),
        (InteractiveKind::FillBlank { correct_answer }, InteractiveAnswer::One(text)) => {
            text.trim().eq_ignore_ascii_case(correct_answer.trim())
        }
        (
            InteractiveKind::MultipleCheckbox { correct_answers, .. },
            InteractiveAnswer::Many(selected),
        ) => {
            // Order-independent exact match: same cardinality, same members.
            let expected: BTreeSet<&str> = correct_answers.iter().map(String::as_str).collect();
            let given: BTreeSet<&str> = selected.iter().map(String::as_str).collect();
            selected.len() == correct_answers.len() && expected == given
        }
        (InteractiveKind::TrueFalse { correct_answer }, InteractiveAnswer::One(text)) => {
            text.trim().eq_ignore_ascii_case(correct_answer)
        }
        // Answer shape does not fit the question kind.
        _ => false,
    }
}

fn score_session(session: &InteractiveQuizSession) -> InteractiveScore {
    let mut breakdown: BTreeMap<String, TypeScore> = BTreeMap::new();
    let mut score = 0u32;
    let mut total_points = 0u32;
    let mut correct_answers = 0u32;

    for question in &session.questions {
        total_points += question.points;
        let entry = breakdown.entry(question.kind.label().to_string()).or_default();
        entry.total += 1;

        // Unanswered questions count toward the totals only.
        let correct = session
            .answers
            .get(&question.id)
            .is_some_and(|answer| evaluate_answer(question, answer));
        if correct {
            entry.correct += 1;
            score += question.points;
            correct_answers += 1;
        }
    }

    for entry in breakdown.values_mut() {
        entry.percentage = if entry.total == 0 {
            0
        } else {
            (entry.correct as f64 * 100.0 / entry.total as f64).round() as u32
        };
    }

    let percentage = if total_points == 0 {
        0
    } else {
        (score as f64 * 100.0 / total_points as f64).round() as u32
    };

    InteractiveScore {
        score,
        total_points,
        percentage,
        correct_answers,
        breakdown,
    }
}

fn build_recommendations(score: &InteractiveScore) -> Vec<String> {
    let tier = if score.percentage >= 90 {
        "Excellent work. You have a strong grasp of this material at every question type."
    } else if score.percentage >= 75 {
        "Good result. A focused review of your weaker question types will get you past 90%."
    } else if score.percentage >= 60 {
        "Decent attempt. Re-study the topics behind the questions you missed before retrying."
    } else {
        "Keep practicing. Go back through study mode and rebuild the fundamentals first."
    };

    let mut recommendations = vec![tier.to_string()];

    // At most two type-specific tips, in fixed kind order.
    let tips = [
        (
            "multiple-choice",
            "Multiple-choice accuracy is low. Eliminate clearly wrong options before picking.",
        ),
        (
            "fill-blank",
            "Fill-in-the-blank answers need work. Practice recalling exact terms, not just recognizing them.",
        ),
        (
            "multiple-checkbox",
            "Multi-select questions need every correct option and nothing else. Check each choice on its own.",
        ),
        (
            "true-false",
            "True/false statements are tripping you up. Watch for absolutes like 'always' and 'never'.",
        ),
    ];

    recommendations.extend(
        tips.iter()
            .filter(|(label, _)| {
                score
                    .breakdown
                    .get(*label)
                    .is_some_and(|t| t.total > 0 && t.percentage < 70)
            })
            .take(2)
            .map(|(_, tip)| tip.to_string()),
    );

    recommendations
}
