//! Category records.

use crate::keys::StoreKey;
use crate::record::{RecordId, Slugged, StoreRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post category.
///
/// Categories are read-mostly: the store seeds a fixed default set and
/// exposes no create/update/delete operations for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Record identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// URL-safe slug.
    pub slug: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl StoreRecord for Category {
    const KEY: StoreKey = StoreKey::Categories;

    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

impl Slugged for Category {
    fn slug(&self) -> &str {
        &self.slug
    }
}
