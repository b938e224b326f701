//! Import command implementation.

use quilldb_core::{import_json, EntityStore, Post};
use std::fs;
use std::path::Path;
use tracing::info;

/// Runs the import command.
///
/// The document is parsed in full before anything is written; malformed
/// input leaves the store untouched.
pub fn run(path: &Path, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!("importing {:?} into store at {:?}", input, path);

    let text = fs::read_to_string(input)?;
    let store = EntityStore::open(path)?;

    import_json(&store, &text)?;

    let posts = store.all::<Post>()?;
    println!("✓ Import applied");
    println!("  Source: {}", input.display());
    println!("  Posts now: {}", posts.len());

    Ok(())
}
