//! Store key names. The per-framework keys keep the historical
//! `mockInterview` namespace so existing persisted data stays readable.

pub const SPACED_REPETITION_ITEMS: &str = "spacedRepetitionItems";
pub const REVIEW_SESSIONS: &str = "reviewSessions";
pub const QUIZ_SESSIONS: &str = "quiz_sessions";
pub const QUIZ_STATS: &str = "quiz_stats";
pub const INTERACTIVE_QUIZ_SESSIONS: &str = "interactive_quiz_sessions";

pub fn progress_index(framework: &str) -> String {
    format!("{framework}_mockInterview.index")
}

pub fn progress_completed(framework: &str) -> String {
    format!("{framework}_mockInterview.completed")
}

pub fn progress_bookmarks(framework: &str) -> String {
    format!("{framework}_mockInterview.bookmarks")
}

pub fn progress_mode(framework: &str) -> String {
    format!("{framework}_mockInterview.mode")
}

pub fn progress_notes(framework: &str) -> String {
    format!("{framework}_mockInterview.notes")
}
