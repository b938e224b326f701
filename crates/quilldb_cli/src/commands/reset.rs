//! Reset command implementation.

use quilldb_core::EntityStore;
use std::path::Path;
use tracing::info;

/// Runs the reset command.
///
/// Clears every collection and reseeds the defaults, including a fresh
/// default credential. Refuses to run without the confirmation flag.
pub fn run(path: &Path, confirmed: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !confirmed {
        return Err("reset discards all data; pass --yes to confirm".into());
    }

    info!("resetting store at {:?}", path);

    let store = EntityStore::open(path)?;
    store.clear_all()?;

    println!("✓ Store reset to seeded defaults");
    println!("  Path: {}", path.display());

    Ok(())
}
