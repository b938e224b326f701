//! Backend-agnostic query surface.
//!
//! Callers describe what they want with plain request values - a
//! [`Selector`] for single-record lookups, an [`Order`] for listings - and
//! call typed repository methods. The same surface is served by two
//! backends:
//!
//! - [`LocalAdapter`] over the in-process [`crate::EntityStore`]
//! - [`RemoteAdapter`] over a remote relational HTTP service
//!
//! Swapping backends is a construction-time decision
//! ([`QueryAdapter::from_config`]); callers never learn which variant is
//! active.
//!
//! # Result contract
//!
//! Every operation returns `CoreResult<_>`: exactly one of a data payload
//! (`Ok`) or an error (`Err`). The two single-record lookups differ only
//! in how they treat zero matches:
//!
//! - [`PostRepository::find_post`] - zero matches is
//!   [`crate::CoreError::NotFound`]
//! - [`PostRepository::find_post_opt`] - zero matches is `Ok(None)`
//!
//! More than one match returns the first, deterministically, in collection
//! order. Mutations are identifier-keyed only; filtering a mutation by any
//! other column is unrepresentable in this API.

mod local;
mod remote;

pub use local::LocalAdapter;
pub use remote::{HttpClient, HttpRequest, HttpResponse, Method, RemoteAdapter};

use crate::config::AdapterConfig;
use crate::error::CoreResult;
use crate::record::{Category, NewPost, Post, PostPatch, RecordId};
use crate::store::EntityStore;
use std::fmt;
use std::sync::Arc;

/// The tables the query surface exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// The posts table.
    Posts,
    /// The categories table.
    Categories,
}

impl Table {
    /// Returns the table name as used by the remote service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Table::Posts => "posts",
            Table::Categories => "categories",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-record filter predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Match on the record identifier.
    Id(RecordId),
    /// Match on the record slug.
    Slug(String),
}

/// A column listings can be ordered by.
///
/// Timestamp columns compare chronologically, text columns
/// lexicographically. A column the table does not carry orders by creation
/// time instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderColumn {
    /// Record creation time.
    CreatedAt,
    /// Post publication time (unpublished records sort earliest).
    PublishedAt,
    /// Display name (post title, category name).
    Name,
}

/// An ordering request for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// The column to order by.
    pub column: OrderColumn,
    /// Sort direction.
    pub ascending: bool,
}

impl Order {
    /// Ascending order on the given column.
    #[must_use]
    pub const fn ascending(column: OrderColumn) -> Self {
        Self {
            column,
            ascending: true,
        }
    }

    /// Descending order on the given column.
    #[must_use]
    pub const fn descending(column: OrderColumn) -> Self {
        Self {
            column,
            ascending: false,
        }
    }
}

/// Query capability set for the posts table.
pub trait PostRepository {
    /// Fetches exactly one post.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::NotFound`] when nothing matches.
    fn find_post(&self, selector: &Selector) -> CoreResult<Post>;

    /// Fetches at most one post; zero matches is `Ok(None)`, not an error.
    fn find_post_opt(&self, selector: &Selector) -> CoreResult<Option<Post>>;

    /// Lists all posts.
    ///
    /// With no explicit order, posts come newest-first by creation time.
    fn list_posts(&self, order: Option<Order>) -> CoreResult<Vec<Post>>;

    /// Inserts a post from authoring input and returns the stored record.
    fn insert_post(&self, draft: NewPost) -> CoreResult<Post>;

    /// Applies a patch to the post with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::NotFound`] when no such post exists.
    fn update_post(&self, id: &RecordId, patch: PostPatch) -> CoreResult<Post>;

    /// Deletes the post with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::NotFound`] when no such post exists.
    fn delete_post(&self, id: &RecordId) -> CoreResult<()>;
}

/// Query capability set for the categories table.
pub trait CategoryRepository {
    /// Lists all categories.
    ///
    /// With no explicit order, categories come ascending by name.
    fn list_categories(&self, order: Option<Order>) -> CoreResult<Vec<Category>>;
}

/// The backend-agnostic query adapter handed to callers.
///
/// Construct with [`QueryAdapter::from_config`] (or the per-backend
/// constructors) and use through the repository traits.
pub enum QueryAdapter {
    /// Queries served by the local entity store.
    Local(LocalAdapter),
    /// Queries served by a remote relational service.
    Remote(RemoteAdapter),
}

impl QueryAdapter {
    /// Creates an adapter over the local entity store.
    #[must_use]
    pub fn local(store: Arc<EntityStore>) -> Self {
        Self::Local(LocalAdapter::new(store))
    }

    /// Creates an adapter over a remote relational service.
    #[must_use]
    pub fn remote(
        config: crate::config::RemoteConfig,
        client: Box<dyn HttpClient>,
    ) -> Self {
        Self::Remote(RemoteAdapter::new(config, client))
    }

    /// Constructs the adapter selected by configuration.
    ///
    /// This is the single swap point between backends. The HTTP client is
    /// supplied lazily so local configurations need none.
    pub fn from_config(
        config: AdapterConfig,
        store: Arc<EntityStore>,
        http: impl FnOnce() -> Box<dyn HttpClient>,
    ) -> Self {
        match config {
            AdapterConfig::Local => Self::local(store),
            AdapterConfig::Remote(remote) => Self::remote(remote, http()),
        }
    }
}

impl PostRepository for QueryAdapter {
    fn find_post(&self, selector: &Selector) -> CoreResult<Post> {
        match self {
            Self::Local(local) => local.find_post(selector),
            Self::Remote(remote) => remote.find_post(selector),
        }
    }

    fn find_post_opt(&self, selector: &Selector) -> CoreResult<Option<Post>> {
        match self {
            Self::Local(local) => local.find_post_opt(selector),
            Self::Remote(remote) => remote.find_post_opt(selector),
        }
    }

    fn list_posts(&self, order: Option<Order>) -> CoreResult<Vec<Post>> {
        match self {
            Self::Local(local) => local.list_posts(order),
            Self::Remote(remote) => remote.list_posts(order),
        }
    }

    fn insert_post(&self, draft: NewPost) -> CoreResult<Post> {
        match self {
            Self::Local(local) => local.insert_post(draft),
            Self::Remote(remote) => remote.insert_post(draft),
        }
    }

    fn update_post(&self, id: &RecordId, patch: PostPatch) -> CoreResult<Post> {
        match self {
            Self::Local(local) => local.update_post(id, patch),
            Self::Remote(remote) => remote.update_post(id, patch),
        }
    }

    fn delete_post(&self, id: &RecordId) -> CoreResult<()> {
        match self {
            Self::Local(local) => local.delete_post(id),
            Self::Remote(remote) => remote.delete_post(id),
        }
    }
}

impl CategoryRepository for QueryAdapter {
    fn list_categories(&self, order: Option<Order>) -> CoreResult<Vec<Category>> {
        match self {
            Self::Local(local) => local.list_categories(order),
            Self::Remote(remote) => remote.list_categories(order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_selects_local_without_building_a_client() {
        let store = Arc::new(EntityStore::open_in_memory().unwrap());
        let adapter = QueryAdapter::from_config(AdapterConfig::Local, store, || {
            unreachable!("local configuration must not build an HTTP client")
        });

        assert!(matches!(adapter, QueryAdapter::Local(_)));
        assert_eq!(adapter.list_posts(None).unwrap().len(), 3);
    }
}
