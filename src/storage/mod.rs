pub mod keys;
pub mod kv;

pub use kv::{DiagnosticSink, KvStore, MemoryBackend, SqliteBackend, StorageBackend, StoreError};
