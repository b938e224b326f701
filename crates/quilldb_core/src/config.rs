//! Store and adapter configuration.

/// Configuration for constructing an entity store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Whether `initialize` seeds absent collections with the default
    /// categories, posts and credential.
    pub seed_defaults: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_defaults: true,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether initialization seeds default data.
    ///
    /// Turning seeding off supports embedding an empty store, e.g. ahead of
    /// an import.
    #[must_use]
    pub const fn seed_defaults(mut self, value: bool) -> Self {
        self.seed_defaults = value;
        self
    }
}

/// Which query backend to construct.
///
/// This is the single swap point between backends: callers hold a
/// [`crate::QueryAdapter`] and never learn which variant is active.
#[derive(Debug, Clone)]
pub enum AdapterConfig {
    /// Query the local entity store.
    Local,
    /// Query a remote relational service over HTTP.
    Remote(RemoteConfig),
}

/// Configuration for the remote relational backend.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the service (e.g. `https://db.example.com/rest/v1`).
    pub base_url: String,
    /// Optional API key, sent as `apikey` and bearer token headers.
    pub api_key: Option<String>,
}

impl RemoteConfig {
    /// Creates a remote configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            api_key: None,
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}
