//! Per-framework study progress: index pointer, completed and bookmarked
//! sets, study mode, and free-text notes. Every mutation is written through
//! to the store under the framework's namespaced keys.

use crate::events::{EventBus, StateEvent};
use crate::storage::{KvStore, keys};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    #[default]
    Sequential,
    Random,
    Bookmarked,
}

pub struct ProgressManager {
    store: KvStore,
    bus: Option<EventBus>,
    framework: String,
    question_ids: Vec<String>,
    index: usize,
    completed: BTreeSet<String>,
    bookmarks: BTreeSet<String>,
    mode: StudyMode,
    notes: BTreeMap<String, String>,
}

impl ProgressManager {
    pub fn new(store: KvStore, framework: &str, question_ids: Vec<String>) -> Self {
        let index = store.read(&keys::progress_index(framework), 0);
        let completed = store.read(&keys::progress_completed(framework), BTreeSet::new());
        let bookmarks = store.read(&keys::progress_bookmarks(framework), BTreeSet::new());
        let mode = store.read(&keys::progress_mode(framework), StudyMode::default());
        let notes = store.read(&keys::progress_notes(framework), BTreeMap::new());

        Self {
            store,
            bus: None,
            framework: framework.to_string(),
            question_ids,
            index,
            completed,
            bookmarks,
            mode,
            notes,
        }
    }

    pub fn with_bus(store: KvStore, framework: &str, question_ids: Vec<String>, bus: EventBus) -> Self {
        let mut manager = Self::new(store, framework, question_ids);
        manager.bus = Some(bus);
        manager
    }

    fn emit(&self, event: StateEvent) {
        if let Some(bus) = &self.bus {
            bus.emit(&event);
        }
    }

    fn persist_index(&self) {
        self.store
            .write(&keys::progress_index(&self.framework), &self.index);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    /// Question id under the pointer; `None` when the pointer was jumped
    /// out of range.
    pub fn current_question_id(&self) -> Option<&str> {
        self.question_ids.get(self.index).map(String::as_str)
    }

    pub fn go_prev(&mut self) {
        self.index = self.index.saturating_sub(1);
        self.persist_index();
    }

    /// Moves forward, marking the question being left as completed.
    pub fn go_next(&mut self) {
        if let Some(id) = self.current_question_id().map(str::to_string) {
            if self.completed.insert(id.clone()) {
                self.store
                    .write(&keys::progress_completed(&self.framework), &self.completed);
                self.emit(StateEvent::QuestionCompleted {
                    framework: self.framework.clone(),
                    question_id: id,
                });
            }
        }

        let last = self.question_ids.len().saturating_sub(1);
        self.index = (self.index + 1).min(last);
        self.persist_index();
    }

    /// Direct pointer set. Bounds are the caller's responsibility; reads of
    /// an out-of-range pointer degrade to `None`.
    pub fn jump(&mut self, index: usize) {
        self.index = index;
        self.persist_index();
    }

    pub fn toggle_bookmark(&mut self, question_id: &str) {
        let bookmarked = if !self.bookmarks.remove(question_id) {
            self.bookmarks.insert(question_id.to_string());
            true
        } else {
            false
        };

        self.store
            .write(&keys::progress_bookmarks(&self.framework), &self.bookmarks);
        self.emit(StateEvent::BookmarkToggled {
            framework: self.framework.clone(),
            question_id: question_id.to_string(),
            bookmarked,
        });
    }

    pub fn save_note(&mut self, question_id: &str, text: &str) {
        self.notes
            .insert(question_id.to_string(), text.to_string());
        self.store
            .write(&keys::progress_notes(&self.framework), &self.notes);
        self.emit(StateEvent::NoteSaved {
            framework: self.framework.clone(),
            question_id: question_id.to_string(),
        });
    }

    pub fn set_mode(&mut self, mode: StudyMode) {
        self.mode = mode;
        self.store
            .write(&keys::progress_mode(&self.framework), &self.mode);
    }

    /// Clears completion, bookmarks, and notes and rewinds the pointer.
    /// The study mode survives a reset. Confirmation is the UI's concern.
    pub fn reset(&mut self) {
        self.completed.clear();
        self.bookmarks.clear();
        self.notes.clear();
        self.index = 0;

        self.store
            .write(&keys::progress_completed(&self.framework), &self.completed);
        self.store
            .write(&keys::progress_bookmarks(&self.framework), &self.bookmarks);
        self.store
            .write(&keys::progress_notes(&self.framework), &self.notes);
        self.persist_index();

        self.emit(StateEvent::ProgressReset {
            framework: self.framework.clone(),
        });
    }

    pub fn is_completed(&self, question_id: &str) -> bool {
        self.completed.contains(question_id)
    }

    pub fn is_bookmarked(&self, question_id: &str) -> bool {
        self.bookmarks.contains(question_id)
    }

    pub fn note(&self, question_id: &str) -> Option<&str> {
        self.notes.get(question_id).map(String::as_str)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn bookmarked_ids(&self) -> impl Iterator<Item = &str> {
        self.bookmarks.iter().map(String::as_str)
    }
}
