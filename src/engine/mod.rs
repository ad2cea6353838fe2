pub mod interactive;
pub mod progress;
pub mod quiz;
pub mod scheduler;

pub use interactive::{InteractiveQuizEngine, evaluate_answer};
pub use progress::{ProgressManager, StudyMode};
pub use quiz::{QuizEngine, generate_quiz_questions};
pub use scheduler::{ReviewStats, Scheduler};
