//! Inspect command implementation.

use quilldb_core::{Category, EntityStore, Post};
use serde::Serialize;
use std::path::Path;

/// Store inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Store path.
    pub path: String,
    /// Number of posts.
    pub post_count: usize,
    /// Number of published posts.
    pub published_count: usize,
    /// Number of categories.
    pub category_count: usize,
    /// Display name of the current session user, if any.
    pub session: Option<String>,
    /// Username of the stored account, if any.
    pub account: Option<String>,
    /// Post listing (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<PostSummary>>,
    /// Category listing (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategorySummary>>,
}

/// One line of the post listing.
#[derive(Debug, Serialize)]
pub struct PostSummary {
    /// Post title.
    pub title: String,
    /// Post slug.
    pub slug: String,
    /// Whether the post is published.
    pub published: bool,
    /// Last mutation time.
    pub updated_at: String,
}

/// One line of the category listing.
#[derive(Debug, Serialize)]
pub struct CategorySummary {
    /// Category name.
    pub name: String,
    /// Category slug.
    pub slug: String,
    /// Category description, if any.
    pub description: Option<String>,
}

/// Runs the inspect command.
pub fn run(
    path: &Path,
    show_posts: bool,
    show_categories: bool,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = EntityStore::open(path)?;

    let posts = store.all::<Post>()?;
    let categories = store.all::<Category>()?;

    let result = InspectResult {
        path: path.display().to_string(),
        post_count: posts.len(),
        published_count: posts.iter().filter(|p| p.published).count(),
        category_count: categories.len(),
        session: store.current_user()?.map(|u| u.display_name),
        account: store.credentials()?.map(|i| i.username),
        posts: show_posts.then(|| {
            posts
                .iter()
                .map(|p| PostSummary {
                    title: p.title.clone(),
                    slug: p.slug.clone(),
                    published: p.published,
                    updated_at: p.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect()
        }),
        categories: show_categories.then(|| {
            categories
                .iter()
                .map(|c| CategorySummary {
                    name: c.name.clone(),
                    slug: c.slug.clone(),
                    description: c.description.clone(),
                })
                .collect()
        }),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        "text" => print_text(&result),
        other => return Err(format!("unknown format: {other}").into()),
    }

    Ok(())
}

fn print_text(result: &InspectResult) {
    println!("Store: {}", result.path);
    println!(
        "  Posts: {} ({} published)",
        result.post_count, result.published_count
    );
    println!("  Categories: {}", result.category_count);
    println!(
        "  Session: {}",
        result.session.as_deref().unwrap_or("none")
    );
    println!(
        "  Account: {}",
        result.account.as_deref().unwrap_or("none")
    );

    if let Some(posts) = &result.posts {
        println!();
        println!("Posts:");
        for post in posts {
            let state = if post.published { "published" } else { "draft" };
            println!(
                "  [{state}] {} ({})  updated {}",
                post.title, post.slug, post.updated_at
            );
        }
    }

    if let Some(categories) = &result.categories {
        println!();
        println!("Categories:");
        for category in categories {
            let description = category
                .description
                .as_deref()
                .map(|d| format!(" - {d}"))
                .unwrap_or_default();
            println!("  {} ({}){description}", category.name, category.slug);
        }
    }
}
