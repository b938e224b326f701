//! Fixed default data seeded into absent collections.

use crate::record::{Category, Credentials, Post, RecordId, LOCAL_USER_ID};
use chrono::{DateTime, Duration, Utc};

/// Username of the seeded default account.
pub(crate) const DEFAULT_USERNAME: &str = "admin";
/// Password of the seeded default account.
pub(crate) const DEFAULT_PASSWORD: &str = "admin";
/// Email of the seeded default account.
pub(crate) const DEFAULT_EMAIL: &str = "admin@example.com";

/// The fixed default categories.
pub(crate) fn default_categories(now: DateTime<Utc>) -> Vec<Category> {
    let category = |id: &str, name: &str, slug: &str, description: &str| Category {
        id: RecordId::from(id),
        name: name.to_string(),
        slug: slug.to_string(),
        description: Some(description.to_string()),
        created_at: now,
    };

    vec![
        category(
            "1",
            "Technology",
            "technology",
            "Posts about latest technology trends",
        ),
        category("2", "Programming", "programming", "Coding tutorials and tips"),
        category("3", "Career", "career", "Career advice and experiences"),
        category(
            "4",
            "AI & Machine Learning",
            "ai-ml",
            "Artificial Intelligence and ML insights",
        ),
    ]
}

/// The fixed default posts. All seeded posts are published.
pub(crate) fn default_posts(now: DateTime<Utc>) -> Vec<Post> {
    let post = |id: &str,
                title: &str,
                slug: &str,
                content: &str,
                excerpt: &str,
                category: &str,
                at: DateTime<Utc>| Post {
        id: RecordId::from(id),
        title: title.to_string(),
        slug: slug.to_string(),
        content: content.to_string(),
        excerpt: Some(excerpt.to_string()),
        featured_image: None,
        category_id: Some(RecordId::from(category)),
        published: true,
        published_at: Some(at),
        created_at: at,
        updated_at: at,
        author_id: LOCAL_USER_ID.to_string(),
    };

    vec![
        post(
            "1",
            "Welcome to Quill",
            "welcome-to-quill",
            WELCOME_POST,
            "A first look around this blog and what to expect here.",
            "1",
            now,
        ),
        post(
            "2",
            "Shipping a Blog Without a Server",
            "shipping-a-blog-without-a-server",
            LOCAL_FIRST_POST,
            "Why this blog keeps every post on your own machine, and what \
             that buys you.",
            "2",
            now,
        ),
        post(
            "3",
            "Notes on Writing Useful Postmortems",
            "notes-on-writing-useful-postmortems",
            POSTMORTEM_POST,
            "A short field guide to incident writeups people actually read.",
            "3",
            now - Duration::days(1),
        ),
    ]
}

/// The seeded default account.
pub(crate) fn default_credentials() -> Credentials {
    Credentials {
        username: DEFAULT_USERNAME.to_string(),
        password: DEFAULT_PASSWORD.to_string(),
        email: DEFAULT_EMAIL.to_string(),
    }
}

const WELCOME_POST: &str = "\
# Welcome to Quill

This is the first post in a fresh Quill store. You can edit it, delete it,
or keep it around as a reference for the markdown the editor supports.

## What you'll find here

- **Real build logs** from side projects and day jobs
- **Tooling notes**, mostly about making small software feel fast
- **Career reflections**, published once they stop being embarrassing

## Where the data lives

Every post you write is stored locally. Export a backup from the data
manager before switching machines, then import it on the other side.

Happy writing!";

const LOCAL_FIRST_POST: &str = "\
# Shipping a Blog Without a Server

When this blog started, the requirements were short: write posts, list
posts, read posts. No comment spam to moderate, no database to operate.

## The trade

Keeping everything in a local store means:

- **No hosting bill** - the reader's machine does the work
- **Instant reads** - no network round trip for a page of posts
- **Trivial backups** - the whole store exports as one JSON document

The cost is equally plain: the data lives in exactly one place. The export
feature is not optional hygiene here, it is the only durability story.

## Swapping the backend later

The storage layer hides behind one interface, so pointing the same
application at a hosted relational service is a construction-time change,
not a rewrite. Posts created locally import cleanly after the move.";

const POSTMORTEM_POST: &str = "\
# Notes on Writing Useful Postmortems

Most incident writeups get filed, not read. The ones that get read share a
few habits.

## Lead with the timeline

Readers reconstruct the incident in their heads. Give them the skeleton
first: what fired, when, who looked, what they saw. Analysis comes after.

## Name the trigger, not the villain

A config push is a trigger. The absent validation that let it through is
the cause. Writeups that stop at the trigger produce action items that
rename variables.

## Keep the action items falsifiable

\"Improve monitoring\" closes itself. \"Alert when the queue depth doubles
inside five minutes\" either exists next quarter or it doesn't.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_posts_are_all_published() {
        let posts = default_posts(Utc::now());
        assert_eq!(posts.len(), 3);
        for post in &posts {
            assert!(post.published);
            assert!(post.published_at.is_some());
            assert_eq!(post.created_at, post.updated_at);
        }
    }

    #[test]
    fn seeded_posts_reference_seeded_categories() {
        let now = Utc::now();
        let categories = default_categories(now);
        let posts = default_posts(now);

        for post in &posts {
            let category = post.category_id.as_ref().unwrap();
            assert!(categories.iter().any(|c| &c.id == category));
        }
    }

    #[test]
    fn seeded_ids_are_distinct() {
        let now = Utc::now();
        let posts = default_posts(now);
        let mut ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), posts.len());
    }

    #[test]
    fn default_account() {
        let creds = default_credentials();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "admin");
    }
}
