//! Entity store: durable CRUD over the persisted collections.

use crate::backup::{ExportDocument, ImportDocument};
use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::CoreResult;
use crate::keys::StoreKey;
use crate::record::{
    Credentials, Identity, NewPost, Post, PostPatch, RecordId, SessionUser, Slugged, StoreRecord,
};
use crate::seed;
use crate::signal::StoreSignal;
use parking_lot::RwLock;
use quilldb_storage::{FileBackend, InMemoryBackend, StorageBackend};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// The entity store.
///
/// `EntityStore` owns the canonical record collections (posts, categories,
/// credentials, session marker) inside a key-value persistence medium and
/// provides the CRUD primitives the query adapter and auth facade build on.
///
/// The store is an explicitly constructed object: construct one, call
/// [`initialize`](Self::initialize) (or use [`open`](Self::open), which
/// does), and inject it where needed. There is no process-global instance.
///
/// # Opening a Store
///
/// ```rust,ignore
/// use quilldb_core::EntityStore;
/// use std::path::Path;
///
/// let store = EntityStore::open(Path::new("quill_data"))?;
/// let posts = store.all::<quilldb_core::Post>()?;
/// ```
///
/// # In-Memory Stores
///
/// For testing, use `EntityStore::open_in_memory()`.
pub struct EntityStore {
    /// Persistence medium.
    backend: RwLock<Box<dyn StorageBackend>>,
    /// Timestamp source.
    clock: Box<dyn Clock>,
    /// Construction options.
    config: StoreConfig,
    /// Store-changed broadcast.
    signal: StoreSignal,
    /// Guard so initialization runs once per store.
    initialized: AtomicBool,
}

impl EntityStore {
    /// Creates an uninitialized store over the given backend.
    ///
    /// Callers must invoke [`initialize`](Self::initialize) before use;
    /// the `open*` constructors do this for you.
    #[must_use]
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self::with_config(backend, StoreConfig::default())
    }

    /// Creates an uninitialized store with custom configuration.
    #[must_use]
    pub fn with_config(backend: Box<dyn StorageBackend>, config: StoreConfig) -> Self {
        Self::with_clock(backend, config, Box::new(SystemClock))
    }

    /// Creates an uninitialized store with a custom clock.
    ///
    /// Tests inject a [`crate::ManualClock`] here to make timestamp
    /// assertions deterministic.
    #[must_use]
    pub fn with_clock(
        backend: Box<dyn StorageBackend>,
        config: StoreConfig,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            backend: RwLock::new(backend),
            clock,
            config,
            signal: StoreSignal::new(),
            initialized: AtomicBool::new(false),
        }
    }

    /// Opens and initializes a file-backed store at the given directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be opened or locked, or if
    /// seeding fails.
    pub fn open(path: &Path) -> CoreResult<Self> {
        let store = Self::new(Box::new(FileBackend::open(path)?));
        store.initialize()?;
        Ok(store)
    }

    /// Opens and initializes an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding fails.
    pub fn open_in_memory() -> CoreResult<Self> {
        let store = Self::new(Box::new(InMemoryBackend::new()));
        store.initialize()?;
        Ok(store)
    }

    /// Initializes the store, seeding any absent collection.
    ///
    /// Runs once per store instance; further calls are no-ops. Seeding is
    /// itself per-collection, so a store that already holds data keeps it.
    ///
    /// # Errors
    ///
    /// Returns an error if a seed write fails.
    pub fn initialize(&self) -> CoreResult<()> {
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }

        if self.config.seed_defaults {
            self.seed_missing()?;
        }

        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    /// Returns the store-changed signal.
    #[must_use]
    pub fn signal(&self) -> &StoreSignal {
        &self.signal
    }

    // ---- collection primitives ------------------------------------------

    /// Returns all records of a collection in persisted (insertion) order.
    ///
    /// An absent collection key yields an empty vector, not an error.
    pub fn all<E: StoreRecord>(&self) -> CoreResult<Vec<E>> {
        match self.read_key(E::KEY)? {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(Vec::new()),
        }
    }

    /// Returns the first record with the given id, or `None`.
    pub fn by_id<E: StoreRecord>(&self, id: &RecordId) -> CoreResult<Option<E>> {
        Ok(self.all::<E>()?.into_iter().find(|r| r.record_id() == id))
    }

    /// Returns the first record with the given slug, or `None`.
    ///
    /// Slug uniqueness is not enforced; with duplicates this returns the
    /// first match in collection order.
    pub fn by_slug<E: Slugged>(&self, slug: &str) -> CoreResult<Option<E>> {
        Ok(self.all::<E>()?.into_iter().find(|r| r.slug() == slug))
    }

    /// Wholesale-replaces a collection with the given records.
    pub fn replace_all<E: StoreRecord>(&self, records: &[E]) -> CoreResult<()> {
        let doc = serde_json::to_string(records)?;
        self.write_key(E::KEY, &doc)
    }

    // ---- post operations -------------------------------------------------

    /// Creates a post from authoring input.
    ///
    /// Assigns a fresh id, stamps `created_at = updated_at = now`, and
    /// derives `published_at` from the published flag.
    pub fn create_post(&self, draft: NewPost) -> CoreResult<Post> {
        let now = self.clock.now();
        let post = Post {
            id: RecordId::generate(),
            title: draft.title,
            slug: draft.slug,
            content: draft.content,
            excerpt: draft.excerpt,
            featured_image: draft.featured_image,
            category_id: draft.category_id,
            published: draft.published,
            published_at: draft.published.then_some(now),
            created_at: now,
            updated_at: now,
            author_id: draft.author_id,
        };

        let mut posts = self.all::<Post>()?;
        posts.push(post.clone());
        self.replace_all(&posts)?;

        debug!(title = %post.title, id = %post.id, "created post");
        Ok(post)
    }

    /// Merges a patch over the post with the given id.
    ///
    /// Returns `Ok(None)` if no such post exists. Otherwise re-stamps
    /// `updated_at`, maintains the published/`published_at` invariant, and
    /// returns the finalized record.
    pub fn update_post(&self, id: &RecordId, patch: PostPatch) -> CoreResult<Option<Post>> {
        let now = self.clock.now();
        let mut posts = self.all::<Post>()?;
        let Some(post) = posts.iter_mut().find(|p| &p.id == id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(slug) = patch.slug {
            post.slug = slug;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(excerpt) = patch.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(image) = patch.featured_image {
            post.featured_image = image;
        }
        if let Some(category) = patch.category_id {
            post.category_id = category;
        }
        if let Some(published) = patch.published {
            post.published = published;
            post.published_at = match (published, post.published_at) {
                // Already published: keep the original publication time.
                (true, Some(at)) => Some(at),
                (true, None) => Some(now),
                (false, _) => None,
            };
        }
        post.updated_at = now;

        let updated = post.clone();
        self.replace_all(&posts)?;

        debug!(title = %updated.title, id = %updated.id, "updated post");
        Ok(Some(updated))
    }

    /// Removes the first post with the given id.
    ///
    /// Returns whether a removal occurred.
    pub fn delete_post(&self, id: &RecordId) -> CoreResult<bool> {
        let mut posts = self.all::<Post>()?;
        let Some(index) = posts.iter().position(|p| &p.id == id) else {
            return Ok(false);
        };

        let removed = posts.remove(index);
        self.replace_all(&posts)?;

        debug!(title = %removed.title, id = %removed.id, "deleted post");
        Ok(true)
    }

    // ---- session operations ----------------------------------------------

    /// Persists or clears the current session.
    ///
    /// `Some` persists the user and sets the authenticated flag; `None`
    /// removes both. The two writes are issued under one backend lock so
    /// they act as a unit within this process; a failure of the first write
    /// aborts the pair and surfaces.
    pub fn set_current_user(&self, user: Option<&SessionUser>) -> CoreResult<()> {
        {
            let mut backend = self.backend.write();
            match user {
                Some(user) => {
                    let doc = serde_json::to_string(user)?;
                    backend.put(StoreKey::CurrentUser.as_str(), &doc)?;
                    backend.put(StoreKey::Authenticated.as_str(), "true")?;
                }
                None => {
                    backend.remove(StoreKey::CurrentUser.as_str())?;
                    backend.remove(StoreKey::Authenticated.as_str())?;
                }
            }
        }

        self.signal.emit(StoreKey::CurrentUser);
        Ok(())
    }

    /// Returns the persisted session user, or `None`.
    pub fn current_user(&self) -> CoreResult<Option<SessionUser>> {
        match self.read_key(StoreKey::CurrentUser)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Returns whether the authenticated flag is set.
    pub fn is_authenticated(&self) -> CoreResult<bool> {
        Ok(self.read_key(StoreKey::Authenticated)?.as_deref() == Some("true"))
    }

    // ---- credential operations -------------------------------------------

    /// Returns whether the stored credentials match exactly.
    ///
    /// Comparison is case-sensitive plaintext equality on both fields.
    /// Returns false when no credentials record exists.
    pub fn validate_credentials(&self, username: &str, password: &str) -> CoreResult<bool> {
        match self.stored_credentials()? {
            Some(stored) => Ok(stored.username == username && stored.password == password),
            None => Ok(false),
        }
    }

    /// Unconditionally replaces the single credentials record.
    pub fn update_credentials(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> CoreResult<()> {
        let creds = Credentials {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        };
        let doc = serde_json::to_string(&creds)?;
        self.write_key(StoreKey::Credentials, &doc)?;

        info!(username, "credentials replaced");
        Ok(())
    }

    /// Returns a password-free view of the stored account, or `None`.
    pub fn credentials(&self) -> CoreResult<Option<Identity>> {
        Ok(self.stored_credentials()?.map(|c| Identity {
            username: c.username,
            email: c.email,
        }))
    }

    // ---- whole-store operations ------------------------------------------

    /// Exports the full posts and categories collections.
    pub fn export_all(&self) -> CoreResult<ExportDocument> {
        Ok(ExportDocument {
            posts: self.all()?,
            categories: self.all()?,
            exported_at: self.clock.now(),
        })
    }

    /// Applies an import document.
    ///
    /// A present `posts` field wholesale-replaces the posts collection;
    /// independently for `categories`. Absent fields leave that collection
    /// untouched. Parsing (and therefore rejection of malformed input)
    /// happens before this is called - see [`crate::parse_import`].
    pub fn import_all(&self, document: ImportDocument) -> CoreResult<()> {
        if let Some(posts) = document.posts {
            self.replace_all(&posts)?;
        }
        if let Some(categories) = document.categories {
            self.replace_all(&categories)?;
        }

        info!("import applied");
        Ok(())
    }

    /// Removes every collection and reseeds the defaults.
    ///
    /// After this returns the store is back in its initialized state,
    /// including a fresh default credential.
    pub fn clear_all(&self) -> CoreResult<()> {
        {
            let mut backend = self.backend.write();
            for key in StoreKey::ALL {
                backend.remove(key.as_str())?;
            }
        }
        for key in StoreKey::ALL {
            self.signal.emit(key);
        }

        info!("store cleared");
        if self.config.seed_defaults {
            self.seed_missing()?;
        }
        Ok(())
    }

    // ---- internals -------------------------------------------------------

    fn stored_credentials(&self) -> CoreResult<Option<Credentials>> {
        match self.read_key(StoreKey::Credentials)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn seed_missing(&self) -> CoreResult<()> {
        let now = self.clock.now();

        if self.read_key(StoreKey::Categories)?.is_none() {
            self.replace_all(&seed::default_categories(now))?;
            info!("seeded default categories");
        }
        if self.read_key(StoreKey::Posts)?.is_none() {
            self.replace_all(&seed::default_posts(now))?;
            info!("seeded default posts");
        }
        if self.read_key(StoreKey::Credentials)?.is_none() {
            let doc = serde_json::to_string(&seed::default_credentials())?;
            self.write_key(StoreKey::Credentials, &doc)?;
            info!("seeded default credentials");
        }
        Ok(())
    }

    fn read_key(&self, key: StoreKey) -> CoreResult<Option<String>> {
        Ok(self.backend.read().get(key.as_str())?)
    }

    fn write_key(&self, key: StoreKey, value: &str) -> CoreResult<()> {
        self.backend.write().put(key.as_str(), value)?;
        self.signal.emit(key);
        Ok(())
    }
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("initialized", &self.initialized.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
