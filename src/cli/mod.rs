//! CLI adapter for the seed loader
//!
//! Parallel to `http/`: both depend on `core/` but not on each other.
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!          +------------+------------+
//!          |                         |
//!          v                         v
//! +------------------+      +------------------+
//! |      http/       |      |      cli/        |
//! | (axum adapter)   |      | (clap adapter)   |
//! +------------------+      +------------------+
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::core::config::Config;
use crate::core::connect::{connect_with_retry, RetryPolicy, LOADER_RETRY_DELAY};
use crate::core::error::Result;
use crate::core::loader;
use crate::core::store::{MongoStore, RecipeStore};
use crate::core::types::LoadReport;

/// Seed the recipe catalog
///
/// Connects to the document store, retrying until it answers, and
/// inserts every recipe from the seed data. Recipes that already
/// exist are left untouched.
#[derive(Parser, Debug)]
#[command(name = "recipes-load")]
#[command(version)]
#[command(about = "Load seed recipes into the document store", long_about = None)]
pub struct LoadCli {
    /// JSON array of recipes to load instead of the bundled dataset
    #[arg(long, env = "RECIPES_SEED_FILE")]
    pub seed_file: Option<PathBuf>,

    /// Milliseconds between connection attempts
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Give up after this many connection attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

impl LoadCli {
    /// Apply command line overrides on top of loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(seed_file) = &self.seed_file {
            config.loader.seed_file = Some(seed_file.clone());
        }
        if let Some(delay) = self.retry_delay_ms {
            config.retry.delay_ms = Some(delay);
        }
        if let Some(max) = self.max_attempts {
            config.retry.max_attempts = Some(max);
        }
    }
}

/// Load seed data into whatever store `connect` yields
///
/// Seed data is read before the first connection attempt so a broken
/// file fails fast. `connect` receives the per-attempt timeout and is
/// retried per `config.retry` until the store answers.
pub async fn run_with_connect<F, Fut>(config: &Config, mut connect: F) -> Result<LoadReport>
where
    F: FnMut(Duration) -> Fut,
    Fut: Future<Output = Result<Arc<dyn RecipeStore>>>,
{
    let recipes = loader::read_seed(config.loader.seed_file.as_deref())?;

    let policy = RetryPolicy::from_config(&config.retry, LOADER_RETRY_DELAY);
    let store = connect_with_retry("to mongodb", policy, || connect(policy.delay)).await?;

    let result = loader::load(store.as_ref(), recipes).await;
    store.shutdown().await;
    result
}

/// Entry point of the `recipes-load` binary
pub async fn run(cli: LoadCli) -> Result<LoadReport> {
    let mut config = Config::load()?;
    cli.apply(&mut config);
    config.validate()?;
    config.log_config();

    let store_config = &config.store;
    run_with_connect(&config, move |timeout| async move {
        let store = MongoStore::connect(store_config, timeout).await?;
        Ok(Arc::new(store) as Arc<dyn RecipeStore>)
    })
    .await
}
