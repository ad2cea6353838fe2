pub mod engine;
pub mod events;
pub mod export;
pub mod models;
pub mod storage;

pub use engine::{InteractiveQuizEngine, ProgressManager, QuizEngine, Scheduler, StudyMode};
pub use events::{EventBus, StateEvent};
pub use models::{
    Difficulty, Question, QuestionCatalog, QuizConfig, QuizLevel, QuizMode, ReviewQuality,
};
pub use storage::{KvStore, MemoryBackend, SqliteBackend};
