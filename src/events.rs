//! Subscriber bus for cross-component state notifications.
//!
//! Components take a bus clone at construction instead of going through
//! process-wide singletons. `emit` notifies every subscriber registered at
//! that moment; a panicking subscriber is logged and skipped so the rest
//! still run.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    QuestionCompleted {
        framework: String,
        question_id: String,
    },
    BookmarkToggled {
        framework: String,
        question_id: String,
        bookmarked: bool,
    },
    NoteSaved {
        framework: String,
        question_id: String,
    },
    ProgressReset {
        framework: String,
    },
    ReviewRecorded {
        question_id: String,
        success: bool,
    },
    QuizCompleted {
        session_id: String,
        percentage: u32,
    },
}

type Subscriber = Box<dyn Fn(&StateEvent) + Send>;

#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F: Fn(&StateEvent) + Send + 'static>(&self, subscriber: F) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(Box::new(subscriber));
        }
    }

    /// Best-effort fan-out to all current subscribers.
    pub fn emit(&self, event: &StateEvent) {
        let Ok(subscribers) = self.subscribers.lock() else {
            return;
        };

        for subscriber in subscribers.iter() {
            if catch_unwind(AssertUnwindSafe(|| subscriber(event))).is_err() {
                log::warn!("event subscriber panicked, skipping it for {event:?}");
            }
        }
    }
}
