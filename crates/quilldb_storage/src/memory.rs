//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;
use std::collections::HashMap;

/// An in-memory storage backend.
///
/// This backend stores all documents in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use quilldb_storage::{StorageBackend, InMemoryBackend};
///
/// let mut backend = InMemoryBackend::new();
/// backend.put("posts", "[]").unwrap();
/// assert_eq!(backend.get("posts").unwrap().as_deref(), Some("[]"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with pre-existing documents.
    ///
    /// Useful for testing returning-user scenarios.
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Returns the number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the backend holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Removes all documents from the backend.
    pub fn clear(&mut self) {
        self.entries.write().clear();
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let backend = InMemoryBackend::new();
        assert!(backend.is_empty());
        assert!(backend.keys().unwrap().is_empty());
    }

    #[test]
    fn memory_put_then_get() {
        let mut backend = InMemoryBackend::new();
        backend.put("a", "one").unwrap();
        assert_eq!(backend.get("a").unwrap().as_deref(), Some("one"));
    }

    #[test]
    fn memory_get_absent_returns_none() {
        let backend = InMemoryBackend::new();
        assert!(backend.get("missing").unwrap().is_none());
    }

    #[test]
    fn memory_put_replaces_previous_value() {
        let mut backend = InMemoryBackend::new();
        backend.put("a", "one").unwrap();
        backend.put("a", "two").unwrap();
        assert_eq!(backend.get("a").unwrap().as_deref(), Some("two"));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn memory_remove() {
        let mut backend = InMemoryBackend::new();
        backend.put("a", "one").unwrap();
        backend.remove("a").unwrap();
        assert!(backend.get("a").unwrap().is_none());
    }

    #[test]
    fn memory_remove_absent_is_noop() {
        let mut backend = InMemoryBackend::new();
        assert!(backend.remove("missing").is_ok());
    }

    #[test]
    fn memory_keys_lists_all_entries() {
        let mut backend = InMemoryBackend::new();
        backend.put("a", "1").unwrap();
        backend.put("b", "2").unwrap();

        let mut keys = backend.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn memory_with_entries() {
        let backend =
            InMemoryBackend::with_entries([("preloaded".to_string(), "data".to_string())]);
        assert_eq!(backend.get("preloaded").unwrap().as_deref(), Some("data"));
    }

    #[test]
    fn memory_clear() {
        let mut backend = InMemoryBackend::new();
        backend.put("a", "1").unwrap();
        backend.clear();
        assert!(backend.is_empty());
    }
}
