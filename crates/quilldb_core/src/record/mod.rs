//! Persisted record types and the traits the store is generic over.

mod category;
mod id;
mod post;
mod user;

pub use category::Category;
pub use id::RecordId;
pub use post::{NewPost, Post, PostPatch};
pub use user::{Credentials, Identity, SessionUser, LOCAL_USER_ID};

use crate::keys::StoreKey;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record persisted inside one of the store's collections.
///
/// The associated [`StoreKey`] names the collection the record lives in;
/// the store's generic operations (`all`, `by_id`, ...) dispatch on it.
pub trait StoreRecord: Serialize + DeserializeOwned + Clone {
    /// The collection this record type is persisted under.
    const KEY: StoreKey;

    /// Returns the record's identifier.
    fn record_id(&self) -> &RecordId;
}

/// A record addressable by a URL-safe slug in addition to its id.
///
/// Slug uniqueness is not enforced by the store; a slug lookup returns the
/// first match in collection order.
pub trait Slugged: StoreRecord {
    /// Returns the record's slug.
    fn slug(&self) -> &str;
}
