use prep_core::engine::generate_quiz_questions;
use prep_core::export::json::import_catalog;
use prep_core::models::{QuizQuestion, ReviewQuality};
use prep_core::*;

fn sample_catalog() -> QuestionCatalog {
    QuestionCatalog {
        framework: "react".to_string(),
        questions: vec![
            Question {
                id: "react-1".to_string(),
                question: "What is the virtual DOM?".to_string(),
                answer: "An in-memory tree diffed against the real DOM.".to_string(),
                category: Some("rendering".to_string()),
                difficulty: Difficulty::Easy,
                tags: vec!["dom".to_string()],
            },
            Question {
                id: "react-2".to_string(),
                question: "What does useMemo do?".to_string(),
                answer: "Caches a computed value between renders.".to_string(),
                category: Some("hooks".to_string()),
                difficulty: Difficulty::Medium,
                tags: vec!["hooks".to_string()],
            },
            Question {
                id: "react-3".to_string(),
                question: "Explain React's reconciliation keys.".to_string(),
                answer: "Keys let the differ match children across renders.".to_string(),
                category: Some("rendering".to_string()),
                difficulty: Difficulty::Hard,
                tags: Vec::new(),
            },
        ],
    }
}

fn main() {
    env_logger::init();

    let backend = SqliteBackend::open("prep_state.sqlite3").expect("Failed to open state database");
    let store = KvStore::new(backend);

    // A catalog file next to the binary wins over the built-in sample.
    let catalog = import_catalog("catalog.json").unwrap_or_else(|_| sample_catalog());
    println!(
        "Loaded catalog '{}' ({} questions)",
        catalog.framework,
        catalog.questions.len()
    );

    let bus = EventBus::new();
    bus.subscribe(|event| log::info!("event: {event:?}"));

    // Study flow: track every catalog question and review the first one.
    let mut scheduler = Scheduler::with_bus(store.clone(), bus.clone());
    for q in &catalog.questions {
        scheduler.add_question(&q.id, &catalog.framework, q.difficulty);
    }
    scheduler.review_item(&catalog.questions[0].id, ReviewQuality::Easy);

    let stats = scheduler.stats();
    println!(
        "Scheduler: {} items, {} due, {} mastered ({:.0}% mastery)",
        stats.total, stats.due, stats.mastered, stats.mastery_rate
    );

    // Quiz flow: generate, answer everything, complete.
    let engine = QuizEngine::with_bus(store.clone(), bus);
    let questions: Vec<QuizQuestion> = generate_quiz_questions(
        QuizLevel::Junior,
        &catalog.questions,
        None,
        &mut rand::thread_rng(),
    );
    let mut session = engine.create_session(
        QuizConfig {
            mode: QuizMode::Quiz,
            level: QuizLevel::Junior,
        },
        questions,
    );

    for i in 0..session.questions.len() {
        let answer = session.questions[i].question.answer.clone();
        engine.submit_answer(&mut session, i, &answer, 12);
        engine.next_question(&mut session);
    }

    if let Some(outcome) = engine.complete(&mut session) {
        println!(
            "Quiz: {}/{} ({}%)",
            outcome.score.correct, outcome.score.total, outcome.score.percentage
        );
        for line in &outcome.recommendations {
            println!("  {line}");
        }
        for badge in &outcome.achievements {
            println!("  Achievement: {badge}");
        }
    }

    // Progress flow: step through the catalog once.
    let mut progress = ProgressManager::new(store, &catalog.framework, catalog.question_ids());
    progress.go_next();
    println!(
        "Progress: index {} / {} completed",
        progress.index(),
        progress.completed_count()
    );
}
