//! Query adapter backed by a remote relational HTTP service.
//!
//! The service speaks the common REST dialect of hosted relational
//! backends: one route per table, `column=eq.value` filter predicates,
//! `order=column.direction` for sorting, and
//! `Prefer: return=representation` to get affected rows back from
//! mutations.
//!
//! The actual HTTP client is abstracted via [`HttpClient`] so different
//! implementations (or scripted test doubles) can be plugged in; the
//! network stack is a collaborator, not part of this crate.
//!
//! Every call here is failable and potentially slow. No timeout or
//! cancellation semantics are layered on top - a client that never
//! returns has no designed recovery.

use crate::config::RemoteConfig;
use crate::error::{CoreError, CoreResult};
use crate::query::{CategoryRepository, Order, OrderColumn, PostRepository, Selector, Table};
use crate::record::{Category, NewPost, Post, PostPatch, RecordId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// HTTP method of a remote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read rows.
    Get,
    /// Insert rows.
    Post,
    /// Patch filtered rows.
    Patch,
    /// Delete filtered rows.
    Delete,
}

impl Method {
    /// Returns the method name on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// A request handed to the [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the filter query string.
    pub url: String,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// JSON body, for mutations.
    pub body: Option<String>,
}

/// A response returned by the [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual transport. Errors are plain
/// strings; the adapter wraps them into [`CoreError::Transport`].
pub trait HttpClient: Send + Sync {
    /// Sends a request and returns the response.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, String>;
}

/// Serves the query surface from a remote relational service.
pub struct RemoteAdapter {
    config: RemoteConfig,
    client: Box<dyn HttpClient>,
}

impl RemoteAdapter {
    /// Creates a remote adapter with the given transport.
    #[must_use]
    pub fn new(config: RemoteConfig, client: Box<dyn HttpClient>) -> Self {
        Self { config, client }
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn headers(&self, has_body: bool, wants_rows: bool) -> Vec<(String, String)> {
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if has_body {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        if wants_rows {
            headers.push(("Prefer".to_string(), "return=representation".to_string()));
        }
        if let Some(key) = &self.config.api_key {
            headers.push(("apikey".to_string(), key.clone()));
            headers.push(("Authorization".to_string(), format!("Bearer {key}")));
        }
        headers
    }

    fn url(&self, table: Table, query: &str) -> String {
        if query.is_empty() {
            format!("{}/{}", self.config.base_url, table.as_str())
        } else {
            format!("{}/{}?{}", self.config.base_url, table.as_str(), query)
        }
    }

    /// Sends a request and decodes the JSON rows of the response.
    fn send_rows<T: DeserializeOwned>(
        &self,
        method: Method,
        table: Table,
        query: &str,
        body: Option<String>,
    ) -> CoreResult<Vec<T>> {
        let wants_rows = method != Method::Get;
        let request = HttpRequest {
            method,
            url: self.url(table, query),
            headers: self.headers(body.is_some(), wants_rows),
            body,
        };
        debug!(method = method.as_str(), url = %request.url, "remote request");

        let response = self
            .client
            .send(&request)
            .map_err(CoreError::transport)?;

        if response.status >= 400 {
            return Err(CoreError::transport(format!(
                "{} {} returned status {}: {}",
                method.as_str(),
                request.url,
                response.status,
                truncate(&response.body, 200),
            )));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            CoreError::transport(format!("undecodable response from {}: {e}", request.url))
        })
    }

    fn body_json(value: &impl Serialize) -> CoreResult<String> {
        Ok(serde_json::to_string(value)?)
    }
}

fn selector_query(selector: &Selector) -> String {
    match selector {
        Selector::Id(id) => format!("id=eq.{id}"),
        Selector::Slug(slug) => format!("slug=eq.{slug}"),
    }
}

fn order_query(table: Table, order: Order) -> String {
    let column = match (table, order.column) {
        (_, OrderColumn::CreatedAt) => "created_at",
        (Table::Posts, OrderColumn::PublishedAt) => "published_at",
        // Categories carry no publication time.
        (Table::Categories, OrderColumn::PublishedAt) => "created_at",
        (Table::Posts, OrderColumn::Name) => "title",
        (Table::Categories, OrderColumn::Name) => "name",
    };
    let direction = if order.ascending { "asc" } else { "desc" };
    format!("order={column}.{direction}")
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

impl PostRepository for RemoteAdapter {
    fn find_post(&self, selector: &Selector) -> CoreResult<Post> {
        self.find_post_opt(selector)?
            .ok_or_else(|| CoreError::not_found(Table::Posts))
    }

    fn find_post_opt(&self, selector: &Selector) -> CoreResult<Option<Post>> {
        let query = format!("select=*&{}", selector_query(selector));
        let rows = self.send_rows::<Post>(Method::Get, Table::Posts, &query, None)?;
        Ok(rows.into_iter().next())
    }

    fn list_posts(&self, order: Option<Order>) -> CoreResult<Vec<Post>> {
        let order = order.unwrap_or(Order::descending(OrderColumn::CreatedAt));
        let query = format!("select=*&{}", order_query(Table::Posts, order));
        self.send_rows(Method::Get, Table::Posts, &query, None)
    }

    fn insert_post(&self, draft: NewPost) -> CoreResult<Post> {
        let body = Self::body_json(&draft)?;
        let rows = self.send_rows::<Post>(Method::Post, Table::Posts, "", Some(body))?;
        rows.into_iter().next().ok_or_else(|| {
            CoreError::transport("insert returned no representation")
        })
    }

    fn update_post(&self, id: &RecordId, patch: PostPatch) -> CoreResult<Post> {
        let body = Self::body_json(&patch)?;
        let query = format!("id=eq.{id}");
        let rows = self.send_rows::<Post>(Method::Patch, Table::Posts, &query, Some(body))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| CoreError::not_found(Table::Posts))
    }

    fn delete_post(&self, id: &RecordId) -> CoreResult<()> {
        let query = format!("id=eq.{id}");
        let rows = self.send_rows::<Post>(Method::Delete, Table::Posts, &query, None)?;
        if rows.is_empty() {
            Err(CoreError::not_found(Table::Posts))
        } else {
            Ok(())
        }
    }
}

impl CategoryRepository for RemoteAdapter {
    fn list_categories(&self, order: Option<Order>) -> CoreResult<Vec<Category>> {
        let order = order.unwrap_or(Order::ascending(OrderColumn::Name));
        let query = format!("select=*&{}", order_query(Table::Categories, order));
        self.send_rows(Method::Get, Table::Categories, &query, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use parking_lot::RwLock;
    use std::collections::VecDeque;

    /// Scripted transport: pops canned responses, records every request.
    struct ScriptedClient {
        responses: RwLock<VecDeque<Result<HttpResponse, String>>>,
        requests: RwLock<Vec<HttpRequest>>,
    }

    impl ScriptedClient {
        fn new(responses: impl IntoIterator<Item = Result<HttpResponse, String>>) -> Self {
            Self {
                responses: RwLock::new(responses.into_iter().collect()),
                requests: RwLock::new(Vec::new()),
            }
        }

        fn ok(body: &str) -> Result<HttpResponse, String> {
            Ok(HttpResponse {
                status: 200,
                body: body.to_string(),
            })
        }
    }

    impl HttpClient for ScriptedClient {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
            self.requests.write().push(request.clone());
            self.responses
                .write()
                .pop_front()
                .unwrap_or_else(|| Err("script exhausted".to_string()))
        }
    }

    fn sample_post_json() -> String {
        let post = Post {
            id: RecordId::from("p1"),
            title: "T".into(),
            slug: "t".into(),
            content: "C".into(),
            excerpt: None,
            featured_image: None,
            category_id: None,
            published: true,
            published_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            author_id: "local-user".into(),
        };
        serde_json::to_string(&vec![post]).unwrap()
    }

    fn adapter_with(
        responses: impl IntoIterator<Item = Result<HttpResponse, String>>,
    ) -> (RemoteAdapter, std::sync::Arc<ScriptedClient>) {
        let client = std::sync::Arc::new(ScriptedClient::new(responses));
        let config = RemoteConfig::new("https://db.example.com/rest/v1")
            .with_api_key("service-key");
        let adapter = RemoteAdapter::new(config, Box::new(ArcClient(client.clone())));
        (adapter, client)
    }

    /// Forwarding wrapper so the test keeps a handle on the script.
    struct ArcClient(std::sync::Arc<ScriptedClient>);

    impl HttpClient for ArcClient {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
            self.0.send(request)
        }
    }

    #[test]
    fn find_builds_filter_url_and_auth_headers() {
        let (adapter, client) = adapter_with([ScriptedClient::ok(&sample_post_json())]);

        let found = adapter
            .find_post(&Selector::Slug("t".into()))
            .unwrap();
        assert_eq!(found.id, RecordId::from("p1"));

        let requests = client.requests.read();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(
            requests[0].url,
            "https://db.example.com/rest/v1/posts?select=*&slug=eq.t"
        );
        assert!(requests[0]
            .headers
            .contains(&("apikey".to_string(), "service-key".to_string())));
        assert!(requests[0]
            .headers
            .contains(&("Authorization".to_string(), "Bearer service-key".to_string())));
    }

    #[test]
    fn find_empty_rows_is_not_found_but_find_opt_is_none() {
        let (adapter, _) = adapter_with([ScriptedClient::ok("[]"), ScriptedClient::ok("[]")]);

        assert!(matches!(
            adapter.find_post(&Selector::Id(RecordId::from("x"))),
            Err(CoreError::NotFound { .. })
        ));
        assert!(adapter
            .find_post_opt(&Selector::Id(RecordId::from("x")))
            .unwrap()
            .is_none());
    }

    #[test]
    fn list_defaults_to_created_at_descending() {
        let (adapter, client) = adapter_with([ScriptedClient::ok("[]")]);

        adapter.list_posts(None).unwrap();
        let requests = client.requests.read();
        assert_eq!(
            requests[0].url,
            "https://db.example.com/rest/v1/posts?select=*&order=created_at.desc"
        );
    }

    #[test]
    fn insert_posts_body_and_prefers_representation() {
        let (adapter, client) = adapter_with([ScriptedClient::ok(&sample_post_json())]);

        let draft = NewPost::new("T", "t", "C").with_published(true);
        adapter.insert_post(draft.clone()).unwrap();

        let requests = client.requests.read();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].url, "https://db.example.com/rest/v1/posts");
        assert!(requests[0]
            .headers
            .contains(&("Prefer".to_string(), "return=representation".to_string())));

        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["slug"], "t");
        assert_eq!(body["published"], true);
    }

    #[test]
    fn update_patches_by_id_and_sends_only_touched_fields() {
        let (adapter, client) = adapter_with([ScriptedClient::ok(&sample_post_json())]);

        adapter
            .update_post(&RecordId::from("p1"), PostPatch::new().with_title("New"))
            .unwrap();

        let requests = client.requests.read();
        assert_eq!(requests[0].method, Method::Patch);
        assert_eq!(
            requests[0].url,
            "https://db.example.com/rest/v1/posts?id=eq.p1"
        );
        assert_eq!(requests[0].body.as_deref(), Some("{\"title\":\"New\"}"));
    }

    #[test]
    fn update_with_no_affected_rows_is_not_found() {
        let (adapter, _) = adapter_with([ScriptedClient::ok("[]")]);

        let result = adapter.update_post(&RecordId::from("x"), PostPatch::new());
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
    }

    #[test]
    fn delete_by_id() {
        let (adapter, client) = adapter_with([ScriptedClient::ok(&sample_post_json())]);

        adapter.delete_post(&RecordId::from("p1")).unwrap();
        let requests = client.requests.read();
        assert_eq!(requests[0].method, Method::Delete);
        assert_eq!(
            requests[0].url,
            "https://db.example.com/rest/v1/posts?id=eq.p1"
        );
    }

    #[test]
    fn error_status_surfaces_as_transport() {
        let (adapter, _) = adapter_with([Ok(HttpResponse {
            status: 500,
            body: "boom".to_string(),
        })]);

        let result = adapter.list_posts(None);
        assert!(matches!(result, Err(CoreError::Transport { .. })));
    }

    #[test]
    fn client_failure_surfaces_as_transport() {
        let (adapter, _) = adapter_with([Err("connection refused".to_string())]);

        let result = adapter.list_posts(None);
        match result {
            Err(CoreError::Transport { message }) => {
                assert!(message.contains("connection refused"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn undecodable_body_surfaces_as_transport() {
        let (adapter, _) = adapter_with([ScriptedClient::ok("not json")]);

        let result = adapter.list_posts(None);
        assert!(matches!(result, Err(CoreError::Transport { .. })));
    }

    #[test]
    fn category_listing_orders_by_name() {
        let (adapter, client) = adapter_with([ScriptedClient::ok("[]")]);

        adapter.list_categories(None).unwrap();
        let requests = client.requests.read();
        assert_eq!(
            requests[0].url,
            "https://db.example.com/rest/v1/categories?select=*&order=name.asc"
        );
    }
}
