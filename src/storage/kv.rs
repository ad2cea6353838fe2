//! Persistent string key-value store with typed JSON access.
//!
//! The contract mirrors browser-local storage: reads fall back to a caller
//! supplied default on any failure, writes are best-effort and dropped on
//! failure. Neither path ever returns an error to the caller; failures go to
//! the log and to an optional diagnostic sink installed at construction.

use rusqlite::{Connection, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Everything that can go wrong underneath `read`/`write`. Only visible
/// through the diagnostic sink; the store's public API is infallible.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to decode value for key '{key}': {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error("backend rejected write for key '{key}': {message}")]
    Backend { key: String, message: String },
}

/// Callback receiving every storage failure.
pub type DiagnosticSink = Arc<dyn Fn(&StoreError) + Send + Sync>;

/// Synchronous string store underneath `KvStore`.
pub trait StorageBackend: Send {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), String>;
    fn remove_item(&mut self, key: &str);
}

/// In-memory backend used by tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryBackend {
    items: HashMap<String, String>,
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// SQLite-backed string store: one `kv_state` table of key/value text pairs.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    pub fn open(path: &str) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            (),
        )?;
        Ok(Self { conn })
    }
}

impl StorageBackend for SqliteBackend {
    fn get_item(&self, key: &str) -> Option<String> {
        self.conn
            .query_row(
                "SELECT value FROM kv_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .ok()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv_state (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn remove_item(&mut self, key: &str) {
        let _ = self
            .conn
            .execute("DELETE FROM kv_state WHERE key = ?1", params![key]);
    }
}

/// Cheaply clonable handle to a shared backend. Every component holds its
/// own clone; all clones read and write the same underlying items.
#[derive(Clone)]
pub struct KvStore {
    backend: Arc<Mutex<dyn StorageBackend>>,
    sink: Option<DiagnosticSink>,
}

impl KvStore {
    pub fn new<B: StorageBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Arc::new(Mutex::new(backend)),
            sink: None,
        }
    }

    /// Installs a diagnostic sink that receives every storage failure.
    pub fn with_sink<B: StorageBackend + 'static>(backend: B, sink: DiagnosticSink) -> Self {
        Self {
            backend: Arc::new(Mutex::new(backend)),
            sink: Some(sink),
        }
    }

    /// In-memory store, mainly for tests.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    fn report(&self, err: StoreError) {
        log::warn!("store: {err}");
        if let Some(sink) = &self.sink {
            sink(&err);
        }
    }

    /// Reads and decodes the value at `key`, or returns `fallback` when the
    /// key is missing or holds something undecodable.
    pub fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.backend.lock() {
            Ok(backend) => backend.get_item(key),
            Err(_) => None,
        };

        let Some(raw) = raw else {
            return fallback;
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(source) => {
                self.report(StoreError::Decode {
                    key: key.to_string(),
                    source,
                });
                fallback
            }
        }
    }

    /// Encodes and stores `value` under `key`. Failures drop the write.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(source) => {
                self.report(StoreError::Encode {
                    key: key.to_string(),
                    source,
                });
                return;
            }
        };

        let result = match self.backend.lock() {
            Ok(mut backend) => backend.set_item(key, &encoded),
            Err(_) => Err("backend lock poisoned".to_string()),
        };

        if let Err(message) = result {
            self.report(StoreError::Backend {
                key: key.to_string(),
                message,
            });
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut backend) = self.backend.lock() {
            backend.remove_item(key);
        }
    }
}
