//! Export command implementation.

use quilldb_core::{export_json, EntityStore};
use std::fs;
use std::path::Path;
use tracing::info;

/// Runs the export command.
///
/// Writes the indented export document to `output`, or to stdout when no
/// output file is given.
pub fn run(path: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    info!("exporting store at {:?}", path);

    let store = EntityStore::open(path)?;
    let document = export_json(&store)?;

    match output {
        Some(output) => {
            fs::write(output, &document)?;
            println!("✓ Export written");
            println!("  Path: {}", output.display());
            println!("  Size: {} bytes", document.len());
        }
        None => println!("{document}"),
    }

    Ok(())
}
