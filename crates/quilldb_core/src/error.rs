//! Error types for QuillDB core.

use crate::query::Table;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in QuillDB core operations.
///
/// Absent-tolerant lookups (`by_id`, `by_slug`, `find_opt`,
/// `current_user`) return `Ok(None)` rather than an error; these variants
/// cover the remaining failure classes.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A single-cardinality lookup matched no record.
    #[error("no matching record in {table}")]
    NotFound {
        /// The table that was searched.
        table: Table,
    },

    /// Credential validation failed.
    #[error("{message}")]
    Validation {
        /// User-facing description of the failure.
        message: String,
    },

    /// An import document failed to parse or lacked the expected structure.
    #[error("import rejected: {message}")]
    Import {
        /// Description of what was wrong with the document.
        message: String,
    },

    /// The remote backend failed or returned an error response.
    #[error("remote backend error: {message}")]
    Transport {
        /// Description of the transport or service failure.
        message: String,
    },

    /// The persistence substrate failed.
    #[error("storage error: {0}")]
    Storage(#[from] quilldb_storage::StorageError),

    /// A persisted document could not be decoded.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl CoreError {
    /// Creates a not-found error for the given table.
    pub fn not_found(table: Table) -> Self {
        Self::NotFound { table }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an import error.
    pub fn import(message: impl Into<String>) -> Self {
        Self::Import {
            message: message.into(),
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}
