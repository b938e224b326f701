//! Query adapter backed by the local entity store.

use crate::error::{CoreError, CoreResult};
use crate::query::{CategoryRepository, Order, OrderColumn, PostRepository, Selector, Table};
use crate::record::{Category, NewPost, Post, PostPatch, RecordId};
use crate::store::EntityStore;
use std::sync::Arc;

/// Serves the query surface from an in-process [`EntityStore`].
///
/// All operations are synchronous and complete without suspension; the
/// only failure source is the persistence substrate itself.
pub struct LocalAdapter {
    store: Arc<EntityStore>,
}

impl LocalAdapter {
    /// Creates a local adapter over the given store.
    #[must_use]
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    fn lookup(&self, selector: &Selector) -> CoreResult<Option<Post>> {
        match selector {
            Selector::Id(id) => self.store.by_id(id),
            Selector::Slug(slug) => self.store.by_slug(slug),
        }
    }
}

impl PostRepository for LocalAdapter {
    fn find_post(&self, selector: &Selector) -> CoreResult<Post> {
        self.lookup(selector)?
            .ok_or_else(|| CoreError::not_found(Table::Posts))
    }

    fn find_post_opt(&self, selector: &Selector) -> CoreResult<Option<Post>> {
        self.lookup(selector)
    }

    fn list_posts(&self, order: Option<Order>) -> CoreResult<Vec<Post>> {
        let mut posts = self.store.all::<Post>()?;
        let order = order.unwrap_or(Order::descending(OrderColumn::CreatedAt));

        match order.column {
            OrderColumn::CreatedAt => posts.sort_by_key(|p| p.created_at),
            // Unpublished posts (no timestamp) sort earliest.
            OrderColumn::PublishedAt => posts.sort_by_key(|p| p.published_at),
            OrderColumn::Name => posts.sort_by(|a, b| a.title.cmp(&b.title)),
        }
        if !order.ascending {
            posts.reverse();
        }
        Ok(posts)
    }

    fn insert_post(&self, draft: NewPost) -> CoreResult<Post> {
        self.store.create_post(draft)
    }

    fn update_post(&self, id: &RecordId, patch: PostPatch) -> CoreResult<Post> {
        self.store
            .update_post(id, patch)?
            .ok_or_else(|| CoreError::not_found(Table::Posts))
    }

    fn delete_post(&self, id: &RecordId) -> CoreResult<()> {
        if self.store.delete_post(id)? {
            Ok(())
        } else {
            Err(CoreError::not_found(Table::Posts))
        }
    }
}

impl CategoryRepository for LocalAdapter {
    fn list_categories(&self, order: Option<Order>) -> CoreResult<Vec<Category>> {
        let mut categories = self.store.all::<Category>()?;
        let order = order.unwrap_or(Order::ascending(OrderColumn::Name));

        match order.column {
            OrderColumn::Name => categories.sort_by(|a, b| a.name.cmp(&b.name)),
            // Categories carry no publication time; both timestamp columns
            // order by creation time.
            OrderColumn::CreatedAt | OrderColumn::PublishedAt => {
                categories.sort_by_key(|c| c.created_at);
            }
        }
        if !order.ascending {
            categories.reverse();
        }
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::StoreConfig;
    use chrono::Duration;
    use quilldb_storage::InMemoryBackend;

    fn adapter() -> (LocalAdapter, ManualClock) {
        let clock = ManualClock::default();
        let store = EntityStore::with_clock(
            Box::new(InMemoryBackend::new()),
            StoreConfig::new().seed_defaults(false),
            Box::new(clock.clone()),
        );
        store.initialize().unwrap();
        (LocalAdapter::new(Arc::new(store)), clock)
    }

    fn seeded_adapter() -> LocalAdapter {
        LocalAdapter::new(Arc::new(EntityStore::open_in_memory().unwrap()))
    }

    #[test]
    fn find_missing_is_not_found_but_find_opt_is_none() {
        let (adapter, _) = adapter();
        let selector = Selector::Id(RecordId::from("missing"));

        assert!(matches!(
            adapter.find_post(&selector),
            Err(CoreError::NotFound { table: Table::Posts })
        ));
        assert!(adapter.find_post_opt(&selector).unwrap().is_none());
    }

    #[test]
    fn find_by_slug() {
        let (adapter, _) = adapter();
        let created = adapter.insert_post(NewPost::new("T", "the-slug", "C")).unwrap();

        let found = adapter
            .find_post(&Selector::Slug("the-slug".into()))
            .unwrap();
        assert_eq!(found.id, created.id);
    }

    #[test]
    fn duplicate_slug_returns_first_in_collection_order() {
        let (adapter, _) = adapter();
        let first = adapter.insert_post(NewPost::new("A", "dup", "1")).unwrap();
        adapter.insert_post(NewPost::new("B", "dup", "2")).unwrap();

        let found = adapter.find_post(&Selector::Slug("dup".into())).unwrap();
        assert_eq!(found.id, first.id);
    }

    #[test]
    fn default_post_order_is_newest_first() {
        let (adapter, clock) = adapter();
        let older = adapter.insert_post(NewPost::new("Old", "old", "C")).unwrap();
        clock.advance(Duration::hours(1));
        let newer = adapter.insert_post(NewPost::new("New", "new", "C")).unwrap();

        let posts = adapter.list_posts(None).unwrap();
        assert_eq!(posts[0].id, newer.id);
        assert_eq!(posts[1].id, older.id);
    }

    #[test]
    fn explicit_ascending_order_by_title() {
        let (adapter, _) = adapter();
        adapter.insert_post(NewPost::new("Banana", "b", "C")).unwrap();
        adapter.insert_post(NewPost::new("Apple", "a", "C")).unwrap();

        let posts = adapter
            .list_posts(Some(Order::ascending(OrderColumn::Name)))
            .unwrap();
        assert_eq!(posts[0].title, "Apple");
        assert_eq!(posts[1].title, "Banana");
    }

    #[test]
    fn published_at_order_sorts_unpublished_first() {
        let (adapter, clock) = adapter();
        adapter
            .insert_post(NewPost::new("Draft", "draft", "C"))
            .unwrap();
        clock.advance(Duration::hours(1));
        adapter
            .insert_post(NewPost::new("Live", "live", "C").with_published(true))
            .unwrap();

        let posts = adapter
            .list_posts(Some(Order::ascending(OrderColumn::PublishedAt)))
            .unwrap();
        assert_eq!(posts[0].title, "Draft");
        assert_eq!(posts[1].title, "Live");
    }

    #[test]
    fn update_missing_post_is_not_found() {
        let (adapter, _) = adapter();
        let result = adapter.update_post(
            &RecordId::from("missing"),
            PostPatch::new().with_title("X"),
        );
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
    }

    #[test]
    fn delete_missing_post_is_not_found() {
        let (adapter, _) = adapter();
        let result = adapter.delete_post(&RecordId::from("missing"));
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
    }

    #[test]
    fn insert_then_delete_then_find_opt_is_none() {
        let (adapter, _) = adapter();
        let created = adapter.insert_post(NewPost::new("T", "t", "C")).unwrap();

        adapter.delete_post(&created.id).unwrap();
        assert!(adapter
            .find_post_opt(&Selector::Id(created.id))
            .unwrap()
            .is_none());
    }

    #[test]
    fn default_category_order_is_name_ascending() {
        let adapter = seeded_adapter();
        let categories = adapter.list_categories(None).unwrap();

        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(categories.len(), 4);
    }

    #[test]
    fn descending_category_order() {
        let adapter = seeded_adapter();
        let categories = adapter
            .list_categories(Some(Order::descending(OrderColumn::Name)))
            .unwrap();
        assert_eq!(categories.first().unwrap().name, "Technology");
    }
}
