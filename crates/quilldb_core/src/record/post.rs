//! Blog post records and their authoring inputs.

use crate::keys::StoreKey;
use crate::record::{RecordId, Slugged, StoreRecord, LOCAL_USER_ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post as persisted in the posts collection.
///
/// # Invariants
///
/// - `published_at` is `Some` if and only if `published` is true
/// - `created_at <= updated_at` across the record's update history
/// - `category_id` is a weak reference: no referential integrity is
///   enforced against the categories collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Record identifier, assigned by the store.
    pub id: RecordId,
    /// Post title.
    pub title: String,
    /// URL-safe slug. Uniqueness is not enforced by the store.
    pub slug: String,
    /// Post body (markdown).
    pub content: String,
    /// Optional short summary for listings.
    pub excerpt: Option<String>,
    /// Optional featured image reference.
    pub featured_image: Option<String>,
    /// Optional category reference.
    pub category_id: Option<RecordId>,
    /// Whether the post is visible to readers.
    pub published: bool,
    /// When the post was published. `Some` iff `published`.
    pub published_at: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last mutated.
    pub updated_at: DateTime<Utc>,
    /// Author reference.
    pub author_id: String,
}

impl StoreRecord for Post {
    const KEY: StoreKey = StoreKey::Posts;

    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

impl Slugged for Post {
    fn slug(&self) -> &str {
        &self.slug
    }
}

/// Authoring input for creating a post.
///
/// Store-assigned fields (`id`, `created_at`, `updated_at`,
/// `published_at`) are stamped by the store at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// URL-safe slug.
    pub slug: String,
    /// Post body (markdown).
    pub content: String,
    /// Optional short summary.
    pub excerpt: Option<String>,
    /// Optional featured image reference.
    pub featured_image: Option<String>,
    /// Optional category reference.
    pub category_id: Option<RecordId>,
    /// Whether the post starts out published.
    pub published: bool,
    /// Author reference.
    pub author_id: String,
}

impl NewPost {
    /// Creates an unpublished draft with the local author.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            content: content.into(),
            excerpt: None,
            featured_image: None,
            category_id: None,
            published: false,
            author_id: LOCAL_USER_ID.to_string(),
        }
    }

    /// Sets the excerpt.
    #[must_use]
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Sets the featured image reference.
    #[must_use]
    pub fn with_featured_image(mut self, image: impl Into<String>) -> Self {
        self.featured_image = Some(image.into());
        self
    }

    /// Sets the category reference.
    #[must_use]
    pub fn with_category(mut self, category_id: RecordId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Sets the published flag.
    #[must_use]
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Sets the author reference.
    #[must_use]
    pub fn with_author(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = author_id.into();
        self
    }
}

/// A partial update to a post.
///
/// `None` fields are left unchanged. Clearable fields use a nested option:
/// the outer level selects whether the field is touched, the inner level is
/// the new value (`None` clears it).
///
/// Serializes with untouched fields omitted, which is also the wire shape
/// the remote backend expects for partial updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostPatch {
    /// New title, if touched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New slug, if touched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// New body, if touched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New excerpt, if touched (`Some(None)` clears it).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<Option<String>>,
    /// New featured image, if touched (`Some(None)` clears it).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<Option<String>>,
    /// New category reference, if touched (`Some(None)` clears it).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<RecordId>>,
    /// New published flag, if touched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl PostPatch {
    /// Creates an empty patch that touches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the patch touches no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the slug.
    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets or clears the excerpt.
    #[must_use]
    pub fn with_excerpt(mut self, excerpt: Option<String>) -> Self {
        self.excerpt = Some(excerpt);
        self
    }

    /// Sets or clears the featured image.
    #[must_use]
    pub fn with_featured_image(mut self, image: Option<String>) -> Self {
        self.featured_image = Some(image);
        self
    }

    /// Sets or clears the category reference.
    #[must_use]
    pub fn with_category(mut self, category_id: Option<RecordId>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Sets the published flag.
    #[must_use]
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_defaults() {
        let draft = NewPost::new("Title", "title", "Body");
        assert!(!draft.published);
        assert!(draft.excerpt.is_none());
        assert_eq!(draft.author_id, LOCAL_USER_ID);
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let patch = PostPatch::new();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_string(&patch).unwrap(), "{}");
    }

    #[test]
    fn patch_clearing_field_serializes_null() {
        let patch = PostPatch::new().with_excerpt(None);
        assert_eq!(serde_json::to_string(&patch).unwrap(), "{\"excerpt\":null}");
    }

    #[test]
    fn patch_builder_touches_only_named_fields() {
        let patch = PostPatch::new().with_title("New").with_published(true);
        assert_eq!(patch.title.as_deref(), Some("New"));
        assert_eq!(patch.published, Some(true));
        assert!(patch.slug.is_none());
        assert!(patch.content.is_none());
    }

    #[test]
    fn post_json_field_names_are_snake_case() {
        let post = Post {
            id: RecordId::from("1"),
            title: "T".into(),
            slug: "t".into(),
            content: "C".into(),
            excerpt: None,
            featured_image: None,
            category_id: None,
            published: false,
            published_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            author_id: LOCAL_USER_ID.into(),
        };

        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("featured_image").is_some());
        assert!(json.get("published_at").is_some());
        assert!(json.get("category_id").is_some());
    }
}
