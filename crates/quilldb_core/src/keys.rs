//! Logical storage keys, one per persisted collection.

use std::fmt;

/// The closed set of keys the store persists under.
///
/// `Posts` and `Categories` hold JSON arrays of records; the remaining keys
/// hold single JSON documents. Dispatching on this enum (rather than raw
/// key strings) keeps the set of collections closed and typo-proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// The posts collection.
    Posts,
    /// The categories collection.
    Categories,
    /// The current session user, if any.
    CurrentUser,
    /// The boolean authenticated flag.
    Authenticated,
    /// The single credentials record.
    Credentials,
}

impl StoreKey {
    /// Every key the store may persist under.
    pub const ALL: [StoreKey; 5] = [
        StoreKey::Posts,
        StoreKey::Categories,
        StoreKey::CurrentUser,
        StoreKey::Authenticated,
        StoreKey::Credentials,
    ];

    /// Returns the stable storage key string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StoreKey::Posts => "quill.posts",
            StoreKey::Categories => "quill.categories",
            StoreKey::CurrentUser => "quill.current-user",
            StoreKey::Authenticated => "quill.authenticated",
            StoreKey::Credentials => "quill.credentials",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_strings_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for key in StoreKey::ALL {
            assert!(seen.insert(key.as_str()));
        }
    }

    #[test]
    fn key_strings_are_filesystem_safe() {
        for key in StoreKey::ALL {
            assert!(key
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
        }
    }
}
