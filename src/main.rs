//! Recipe API server entry point
//!
//! Connects to the document store, retrying until it answers, and
//! only then starts serving the REST API.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipes::core::config::Config;
use recipes::core::connect::{connect_with_retry, RetryPolicy, SERVER_RETRY_DELAY};
use recipes::core::services::Services;
use recipes::core::store::{MongoStore, RecipeStore};
use recipes::http;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing, RECIPES_LOG_FORMAT=json for structured output
    let json = std::env::var("RECIPES_LOG_FORMAT").is_ok_and(|format| format == "json");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipes=info,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting recipe API");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load()?;

    // Log configuration details
    config.log_config();

    // The listener must not bind before the store answers
    let policy = RetryPolicy::from_config(&config.retry, SERVER_RETRY_DELAY);
    let store = connect_with_retry("to mongodb", policy, || {
        MongoStore::connect(&config.store, policy.delay)
    })
    .await?;
    tracing::info!("connected to mongodb");

    let services = Arc::new(Services::new(config, Arc::new(store.clone())));

    http::serve(services).await?;

    store.shutdown().await;
    Ok(())
}
