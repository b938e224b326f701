//! Whole-store backup and restore.
//!
//! The export format is a single human-readable JSON document:
//!
//! ```json
//! {
//!   "posts": [ ... ],
//!   "categories": [ ... ],
//!   "exported_at": "2026-01-01T00:00:00Z"
//! }
//! ```
//!
//! Import accepts the same shape with either collection field optional; an
//! absent field leaves that collection untouched. Malformed text is
//! rejected wholesale before any store write.

use crate::error::{CoreError, CoreResult};
use crate::record::{Category, Post};
use crate::store::EntityStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A full export of the store's content collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// The full posts collection, in persisted order.
    pub posts: Vec<Post>,
    /// The full categories collection, in persisted order.
    pub categories: Vec<Category>,
    /// When the export was taken.
    pub exported_at: DateTime<Utc>,
}

impl ExportDocument {
    /// Renders the document as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns a codec error if serialization fails.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// An import document with independently optional collections.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportDocument {
    /// Replacement posts collection, if present.
    pub posts: Option<Vec<Post>>,
    /// Replacement categories collection, if present.
    pub categories: Option<Vec<Category>>,
}

/// Parses import text into an [`ImportDocument`].
///
/// # Errors
///
/// Returns [`CoreError::Import`] if the text is not valid JSON or does not
/// match the expected structure. Nothing is written to any store by this
/// function, so a rejection leaves existing data untouched.
pub fn parse_import(text: &str) -> CoreResult<ImportDocument> {
    serde_json::from_str(text).map_err(|e| CoreError::import(e.to_string()))
}

/// Exports the store as indented JSON text.
///
/// Thin pass-through over [`EntityStore::export_all`].
pub fn export_json(store: &EntityStore) -> CoreResult<String> {
    store.export_all()?.to_json()
}

/// Parses import text and applies it to the store.
///
/// The parse happens in full before any write, so malformed input changes
/// nothing.
pub fn import_json(store: &EntityStore, text: &str) -> CoreResult<()> {
    let document = parse_import(text)?;
    store.import_all(document)
}
