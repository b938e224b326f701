//! Storage backend trait definition.

use crate::error::StorageResult;

/// A low-level storage backend for QuillDB.
///
/// Storage backends are **opaque document stores**. They map string keys to
/// string documents and provide simple operations for reading, replacing,
/// and removing them. QuillDB owns all document interpretation - backends do
/// not understand records, collections, or the session marker.
///
/// # Invariants
///
/// - `get` returns exactly the document previously stored under that key
/// - `get` on an absent key returns `Ok(None)`; absence is not an error
/// - `put` replaces any previous document under the key
/// - `remove` on an absent key succeeds as a no-op
/// - Backends must be `Send + Sync` for shared access
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the document stored under `key`.
    ///
    /// Returns `Ok(None)` if no document exists for the key.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous document.
    ///
    /// After this returns successfully, `get(key)` observes `value` until
    /// the next `put` or `remove`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be persisted. Callers must
    /// treat a failed `put` as a lost write and surface it.
    fn put(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes the document stored under `key`.
    ///
    /// Removing an absent key is a no-op and succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing document cannot be removed.
    fn remove(&mut self, key: &str) -> StorageResult<()>;

    /// Returns all keys with a stored document, in unspecified order.
    ///
    /// # Errors
    ///
    /// Returns an error if the key set cannot be enumerated.
    fn keys(&self) -> StorageResult<Vec<String>>;
}
