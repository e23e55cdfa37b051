//! Recipe seed loader
//!
//! Inserts the bundled recipes into the document store, skipping any
//! that are already present. Exits 0 once everything is loaded and 1
//! on any other failure.
//!
//! # Examples
//!
//! ```bash
//! # Load the bundled dataset
//! STORE_HOST=mongodb STORE_DATABASE=okteto recipes-load
//!
//! # Load a different file
//! recipes-load --seed-file ./more-recipes.json
//! ```

use clap::Parser;
use recipes::cli::{run, LoadCli};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "recipes=info".into()),
        )
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = LoadCli::parse();

    match run(cli).await {
        Ok(report) => {
            tracing::info!(
                submitted = report.submitted,
                inserted = report.inserted,
                duplicates = report.duplicates,
                "Seed data loaded"
            );
            println!("all loaded");
        }
        Err(e) => {
            eprintln!("errors while loading: {e}");
            std::process::exit(1);
        }
    }
}
