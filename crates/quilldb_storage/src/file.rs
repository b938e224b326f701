//! File-based storage backend for persistent storage.
//!
//! On disk, a store is a directory with one document file per key:
//!
//! ```text
//! <store_path>/
//! ├─ LOCK                  # Advisory lock for single-process access
//! ├─ quill.posts.json      # One document per key
//! └─ quill.categories.json
//! ```
//!
//! The LOCK file ensures only one process opens the store at a time.
//! Document writes go through a temporary file and an atomic rename, so a
//! crash mid-write never leaves a torn document behind.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Name of the advisory lock file inside the store directory.
const LOCK_FILE: &str = "LOCK";
/// Extension used for document files.
const DOCUMENT_EXT: &str = "json";
/// Extension used for in-flight document writes.
const TEMP_EXT: &str = "json.tmp";

/// A file-based storage backend.
///
/// Each key maps to one UTF-8 document file inside the store directory.
/// Data survives process restarts.
///
/// # Thread Safety
///
/// The backend holds an exclusive advisory lock on the store directory for
/// its lifetime; a second open of the same directory fails with
/// [`StorageError::Locked`].
///
/// # Example
///
/// ```no_run
/// use quilldb_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("quill_data")).unwrap();
/// backend.put("quill.posts", "[]").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    /// Lock file handle (held for exclusive access).
    _lock_file: File,
}

impl FileBackend {
    /// Opens or creates a store directory at the given path.
    ///
    /// Creates the directory (and parents) if it doesn't exist, then
    /// acquires the exclusive lock.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path exists but is not a directory
    /// - Another process holds the lock (`Locked`)
    /// - I/O errors occur
    pub fn open(path: &Path) -> StorageResult<Self> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("store path is not a directory: {}", path.display()),
            )));
        }

        let lock_path = path.join(LOCK_FILE);
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        // Non-blocking: a held lock means another live process owns the store.
        if lock_file.try_lock_exclusive().is_err() {
            return Err(StorageError::Locked);
        }

        Ok(Self {
            path: path.to_path_buf(),
            _lock_file: lock_file,
        })
    }

    /// Returns the path to the store directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn document_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.path.join(format!("{key}.{DOCUMENT_EXT}")))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.path.join(format!("{key}.{TEMP_EXT}"))
    }
}

/// Keys become file names, so they are restricted to a filesystem-safe set.
fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::invalid_key(key, "key is empty"));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(StorageError::invalid_key(
            key,
            "keys may only contain ASCII alphanumerics, '.', '_' and '-'",
        ));
    }
    Ok(())
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.document_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| StorageError::corrupted(key, e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.document_path(key)?;
        let temp = self.temp_path(key);

        fs::write(&temp, value)?;
        fs::rename(&temp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.document_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.ends_with(&format!(".{TEMP_EXT}")) {
                continue;
            }
            if let Some(key) = name.strip_suffix(&format!(".{DOCUMENT_EXT}")) {
                if validate_key(key).is_ok() {
                    keys.push(key.to_string());
                }
            }
        }
        Ok(keys)
    }
}
