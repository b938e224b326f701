//! # QuillDB Core
//!
//! Core storage engine for QuillDB, a small embedded blog store.
//!
//! This crate provides:
//! - Entity store for CRUD over posts, categories, credentials and the
//!   session marker
//! - Backend-agnostic query adapter (local store or remote relational
//!   service)
//! - Auth facade with publish/subscribe state-change notification
//! - Backup/restore as an indented JSON document
//!
//! # Opening a Store
//!
//! ```rust,ignore
//! use quilldb_core::EntityStore;
//! use std::path::Path;
//!
//! let store = EntityStore::open(Path::new("quill_data"))?;
//! let posts = store.all::<quilldb_core::Post>()?;
//! ```
//!
//! For tests, use `EntityStore::open_in_memory()`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod backup;
mod clock;
mod config;
mod error;
mod keys;
mod query;
mod record;
mod seed;
mod signal;
mod store;

pub use auth::{AuthEvent, AuthService, AuthSubscription};
pub use backup::{export_json, import_json, parse_import, ExportDocument, ImportDocument};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AdapterConfig, RemoteConfig, StoreConfig};
pub use error::{CoreError, CoreResult};
pub use keys::StoreKey;
pub use query::{
    CategoryRepository, HttpClient, HttpRequest, HttpResponse, LocalAdapter, Method, Order,
    OrderColumn, PostRepository, QueryAdapter, RemoteAdapter, Selector, Table,
};
pub use record::{
    Category, Credentials, Identity, NewPost, Post, PostPatch, RecordId, SessionUser, Slugged,
    StoreRecord, LOCAL_USER_ID,
};
pub use signal::{StoreEvent, StoreSignal};
pub use store::EntityStore;

/// Crate version, for tooling banners.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
