//! QuillDB CLI
//!
//! Command-line tools for managing a file-backed QuillDB store.
//!
//! # Commands
//!
//! - `inspect` - Display store contents and session status
//! - `export` - Write the store as an indented JSON document
//! - `import` - Apply an exported document to the store
//! - `reset` - Clear the store back to its seeded default state

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default store directory when `--path` is not given.
const DEFAULT_STORE_DIR: &str = "quill_data";

/// QuillDB command-line store tools.
#[derive(Parser)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display store contents and session status
    Inspect {
        /// List the posts collection
        #[arg(long)]
        posts: bool,

        /// List the categories collection
        #[arg(long)]
        categories: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Write the store as an indented JSON document
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply an exported document to the store
    Import {
        /// File holding the exported document
        input: PathBuf,
    },

    /// Clear the store back to its seeded default state
    Reset {
        /// Confirm the reset; refused otherwise
        #[arg(long)]
        yes: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let path = cli
        .path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));

    match cli.command {
        Commands::Inspect {
            posts,
            categories,
            format,
        } => {
            commands::inspect::run(&path, posts, categories, &format)?;
        }
        Commands::Export { output } => {
            commands::export::run(&path, output.as_deref())?;
        }
        Commands::Import { input } => {
            commands::import::run(&path, &input)?;
        }
        Commands::Reset { yes } => {
            commands::reset::run(&path, yes)?;
        }
        Commands::Version => {
            println!("QuillDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("QuillDB Core v{}", quilldb_core::VERSION);
        }
    }

    Ok(())
}
